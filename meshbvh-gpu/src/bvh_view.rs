use crate::BvhNode;

#[derive(Clone, Copy)]
pub struct BvhView<'a> {
    buffer: &'a [BvhNode],
}

impl<'a> BvhView<'a> {
    pub fn new(buffer: &'a [BvhNode]) -> Self {
        Self { buffer }
    }

    pub fn get(&self, id: u32) -> BvhNode {
        self.buffer[id as usize]
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }
}
