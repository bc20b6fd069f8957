pub mod serialization;
pub mod deserialization;
pub mod layers_loading;
pub mod image_loading;
pub mod dataset_loading;
