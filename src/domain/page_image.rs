/// One rendered page, as returned by a rasterizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub page: u32,
    pub png: Vec<u8>,
}

impl PageImage {
    pub fn new(page: u32, png: Vec<u8>) -> Self {
        Self { page, png }
    }
}
