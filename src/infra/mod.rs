pub mod nominatim_client;
pub mod pacer_adapter;
pub mod progress_adapter;
