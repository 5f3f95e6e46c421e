use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{TextureCreator, WindowCanvas};
use sdl2::video::WindowContext;

use chip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_core::{FrameBuffer, Pixels};

/// # Display
/// The Chip-8 display is composed of 64x32 pixels black/white pixels.
/// The on/off state of these pixels is encoded as 1/0 respectively in a 2d array of 64x32 bytes.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
///
/// SDL2 reports its failures as strings; they are passed straight through.
pub struct Display {
    canvas: WindowCanvas,
    texture_creator: TextureCreator<WindowContext>,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `title` the window title
    /// * `scale` the size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, title: &str, scale: u32) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window(
                title,
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window
            .into_canvas()
            .build()
            .map_err(|e| e.to_string())?;
        let texture_creator = canvas.texture_creator();

        Ok(Display {
            canvas,
            texture_creator,
        })
    }

    /// Formats Chip-8 pixels for rendering as an SDL2 texture.
    ///
    /// An SDL2 texture is a 1D array of ints that represent concatenated rows of RGB pixels.
    ///
    /// This creates a black and white rendering by:
    /// - Flattening the 2D pixel grid into a 1D array by concatenating its rows
    /// - Triplicating each element of that 1D array to represent the RGB values of each pixel
    /// - Multiplying each value by 255 to convert from a binary state to 0-255 intensity
    ///
    /// # Arguments
    /// * `pixels` the lit state of every pixel, row by row
    fn pixels_to_sdl_texture(pixels: &Pixels) -> Vec<u8> {
        pixels
            .iter()
            .flat_map(|row| row.iter())
            .flat_map(|&p| std::iter::repeat(p * 255).take(3))
            .collect()
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        let mut texture = self
            .texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        let rgb = Display::pixels_to_sdl_texture(frame.pixels());
        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            for (row, line) in rgb.chunks(DISPLAY_WIDTH * 3).enumerate() {
                let start = row * pitch;
                buffer[start..start + line.len()].copy_from_slice(line);
            }
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixels_to_sdl_texture() {
        let mut pixels: Pixels = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        pixels[0][0..2].copy_from_slice(&[0, 1]);
        pixels[1][0..2].copy_from_slice(&[1, 0]);
        let texture = Display::pixels_to_sdl_texture(&pixels);

        let mut expected: Vec<u8> = vec![0; 6144];
        expected[0..6].copy_from_slice(&[0, 0, 0, 255, 255, 255]);
        expected[192..198].copy_from_slice(&[255, 255, 255, 0, 0, 0]);

        assert_eq!(texture, expected);
    }

    #[test]
    fn test_frame_buffer_texture() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprite(&[0x80], 63, 31);
        let texture = Display::pixels_to_sdl_texture(frame.pixels());
        assert_eq!(texture[6141..6144], [255, 255, 255]);
        assert!(texture[..6141].iter().all(|&c| c == 0));
    }
}
