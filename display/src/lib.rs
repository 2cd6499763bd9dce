use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{TextureValueError, WindowCanvas};
use sdl2::video::WindowBuildError;
use sdl2::IntegerOrSdlError;
use thiserror::Error;

use emu8::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use emu8::FrameBuffer;

/// Bytes per pixel of an RGB24 texture
const CHANNELS: usize = 3;

#[derive(Debug, Error)]
pub enum Error {
    #[error("SDL error: {0}")]
    Sdl(String),

    #[error(transparent)]
    Window(#[from] WindowBuildError),

    #[error(transparent)]
    Canvas(#[from] IntegerOrSdlError),

    #[error(transparent)]
    Texture(#[from] TextureValueError),
}

// sdl2 reports most of its failures as bare strings
impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Sdl(message)
    }
}

/// # Screen
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// The screen only gets a call to `render` when the Chip-8 FrameBuffer is updated.
pub struct Screen {
    canvas: WindowCanvas,
}

impl Screen {
    /// Opens a window bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `scale` the size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, scale: u32) -> Result<Self, Error> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window(
                "Emu-8",
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .opengl()
            .build()?;
        let mut canvas = window.into_canvas().build()?;
        canvas.clear();
        canvas.present();
        log::debug!("opened a {}x scaled window", scale);

        Ok(Screen { canvas })
    }

    /// Formats a Chip-8 FrameBuffer for rendering as an SDL2 texture.
    ///
    /// An SDL2 texture is a 1D array of ints that represent concatenated rows of RGB pixels.
    ///
    /// This creates a black and white rendering by:
    /// - Flattening the 2D frame buffer into a 1D array by concatenating its rows
    /// - Converting each pixel to full or zero intensity
    /// - Triplicating that intensity for the RGB values of the pixel
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn frame_to_sdl_texture(frame: &FrameBuffer) -> Vec<u8> {
        frame
            .iter()
            .flat_map(|row| row.iter())
            .map(|&lit| if lit { 0xFF } else { 0x00 })
            .flat_map(|intensity| std::iter::repeat(intensity).take(CHANNELS))
            .collect()
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), Error> {
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator.create_texture_streaming(
            PixelFormatEnum::RGB24,
            DISPLAY_WIDTH as u32,
            DISPLAY_HEIGHT as u32,
        )?;

        let pixels = Screen::frame_to_sdl_texture(frame);
        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            // rows of the texture may be padded out past the width of the frame
            let row_len = DISPLAY_WIDTH * CHANNELS;
            for (y, row) in pixels.chunks(row_len).enumerate() {
                buffer[y * pitch..y * pitch + row_len].copy_from_slice(row);
            }
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}
