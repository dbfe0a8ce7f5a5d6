pub mod dwg;
pub mod dxf;
pub mod gif;
pub mod jpeg;
pub mod markup;
pub mod mp4;
pub mod office;
pub mod pdf;
pub mod png;
pub mod text;
pub mod wav;
pub mod zip;
