//! SeaORM entities for the datatype tables, in their post-1.3.2 shape.

pub mod connectivity;
pub mod data_types;
pub mod region_mapping;
pub mod region_volume_mapping;
pub mod sensors;
pub mod time_series;
pub mod time_series_region;
