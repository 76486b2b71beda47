pub mod resource_service;

pub use resource_service::{is_present, Patch, ResourceService, ServiceError, ServiceResult};
