pub mod fourier;
pub mod frequency_filter;
pub mod frequency_grid;
pub mod frequency_mask;
pub mod morphology;
pub mod noise_removal;
pub mod operation;
pub mod pixel_buffer;
pub mod plane;
pub mod region_growing;
pub mod similarity;
pub mod spatial_filter;
pub mod statistics;
pub mod structuring_element;
pub mod summed_area_table;
pub mod transform_2d;
