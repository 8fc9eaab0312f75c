//! different utility modules used throughout the project
/// tiny module to save solutions into files and set up console logging
pub mod logger;
/// tiny module to plot time series and spatial profiles
pub mod plots;
