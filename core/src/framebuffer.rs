use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Pixels indexed as [y][x]; 1 is lit, 0 is dark
pub type Pixels = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// # FrameBuffer
/// The contents of a single 64x32 monochrome frame.
///
/// Sprites are XORed onto the buffer and wrap around both edges, so anything
/// drawn off the right or bottom reappears on the left or top.
///
/// `changed` is raised by every clear and draw; renderers poll it through
/// `take_changed` rather than being called back mid-instruction.
#[derive(Copy, Clone)]
pub struct FrameBuffer {
    pixels: Pixels,
    changed: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            changed: false,
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.changed = true;
    }

    /// XORs a sprite onto the buffer with its top-left corner at (x, y).
    ///
    /// Each byte of `sprite` is one 8 pixel row, most significant bit leftmost.
    /// Returns true if any lit pixel was turned off.
    pub fn draw_sprite(&mut self, sprite: &[u8], x: u8, y: u8) -> bool {
        let mut collision = false;

        for (row, &byte) in sprite.iter().enumerate() {
            let py = (y as usize + row) % DISPLAY_HEIGHT;
            for bit in 0..8 {
                if byte & (0x80u8 >> bit) == 0 {
                    continue;
                }
                let px = (x as usize + bit) % DISPLAY_WIDTH;
                let pixel = &mut self.pixels[py][px];
                collision |= *pixel == 1;
                *pixel ^= 1;
            }
        }

        self.changed = true;
        collision
    }

    /// Whether the pixel at (x, y) is lit; coordinates wrap like sprite drawing does
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH] == 1
    }

    pub fn pixels(&self) -> &Pixels {
        &self.pixels
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Returns whether the buffer changed since the last call and lowers the flag
    pub fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test_framebuffer {
    use super::*;
    use crate::constants::SPRITE_SHEET;

    fn lit(frame_buffer: &FrameBuffer) -> usize {
        frame_buffer
            .pixels()
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&p| p == 1)
            .count()
    }

    #[test]
    fn test_draws_glyph() {
        let mut frame_buffer = FrameBuffer::new();
        // the 0 glyph with a 1x 1y offset
        let collision = frame_buffer.draw_sprite(&SPRITE_SHEET[0..5], 1, 1);
        assert!(!collision);

        let mut expected: Pixels = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        expected[1][1..5].copy_from_slice(&[1, 1, 1, 1]);
        expected[2][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[3][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[4][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[5][1..5].copy_from_slice(&[1, 1, 1, 1]);
        assert!(frame_buffer
            .pixels()
            .iter()
            .zip(expected.iter())
            .all(|(a, b)| a[..] == b[..]));
    }

    #[test]
    fn test_xors() {
        let mut frame_buffer = FrameBuffer::new();
        // 0 1 0 1 -> Set
        frame_buffer.pixels[0][2..6].copy_from_slice(&[0, 1, 0, 1]);
        // 1 1 0 0 -> Draw xor
        frame_buffer.draw_sprite(&[0b1100_0000], 2, 0);
        assert_eq!(frame_buffer.pixels[0][2..6], [1, 0, 0, 1]);
    }

    #[test]
    fn test_collides() {
        let mut frame_buffer = FrameBuffer::new();
        frame_buffer.pixels[0][0] = 1;
        assert!(frame_buffer.draw_sprite(&[0x80], 0, 0));
    }

    #[test]
    fn test_collision_accumulates_across_rows() {
        let mut frame_buffer = FrameBuffer::new();
        frame_buffer.pixels[0][0] = 1;
        // first row collides, second row doesn't; the whole call still reports it
        assert!(frame_buffer.draw_sprite(&[0x80, 0x80], 0, 0));
    }

    #[test]
    fn test_self_xor_erases() {
        let mut frame_buffer = FrameBuffer::new();
        let glyph = &SPRITE_SHEET[40..45];
        assert!(!frame_buffer.draw_sprite(glyph, 10, 10));
        assert!(lit(&frame_buffer) > 0);
        assert!(frame_buffer.draw_sprite(glyph, 10, 10));
        assert_eq!(lit(&frame_buffer), 0);
    }

    #[test]
    fn test_wraps_around_corner() {
        let mut frame_buffer = FrameBuffer::new();
        frame_buffer.draw_sprite(&[0xFF; 5], 60, 30);
        // columns 60..64 and 0..4, rows 30..32 and 0..3
        for &y in &[30, 31, 0, 1, 2] {
            for &x in &[60, 61, 62, 63, 0, 1, 2, 3] {
                assert!(frame_buffer.pixel(x, y), "({}, {}) should be lit", x, y);
            }
        }
        assert!(frame_buffer.pixel(0, 0));
        assert!(!frame_buffer.pixel(4, 0));
        assert!(!frame_buffer.pixel(0, 3));
        assert_eq!(lit(&frame_buffer), 40);
    }

    #[test]
    fn test_clear() {
        let mut frame_buffer = FrameBuffer::new();
        frame_buffer.draw_sprite(&[0xFF], 0, 0);
        frame_buffer.clear();
        assert_eq!(lit(&frame_buffer), 0);
    }

    #[test]
    fn test_changed_flag() {
        let mut frame_buffer = FrameBuffer::new();
        assert!(!frame_buffer.is_changed());
        frame_buffer.draw_sprite(&[0x80], 0, 0);
        assert!(frame_buffer.take_changed());
        assert!(!frame_buffer.take_changed());
        frame_buffer.clear();
        assert!(frame_buffer.is_changed());
    }
}
