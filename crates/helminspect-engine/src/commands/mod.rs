pub mod calibrate;
pub mod detect;
pub mod engine_command;
