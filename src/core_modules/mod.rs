pub mod displacement;
pub mod frame_source;
pub mod movement_filter;
pub mod pattern;
pub mod pixel_buffer;
