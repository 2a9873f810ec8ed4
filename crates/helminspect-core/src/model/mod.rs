pub mod identity;
pub mod ignore;
pub mod kind;
pub mod path;
pub mod resource;
pub mod snapshot;

pub use identity::RunIdentity;
pub use ignore::{IgnoreRule, IgnoreSet};
pub use kind::ResourceKind;
pub use path::{Path, PathSegment};
pub use resource::Resource;
pub use snapshot::CalibrationSnapshot;
