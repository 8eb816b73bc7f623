//! Trait for frame-producing video collaborators.

use image::RgbImage;

/// Trait for frame acquisition backends.
///
/// Implement this trait to feed any video source into the tracker.
/// `Ok(None)` signals that the stream is exhausted and ends the session.
///
/// # Example
///
/// ```ignore
/// use hooptrack_rs::FrameSource;
/// use image::RgbImage;
///
/// struct MyCapture {
///     // Your decoder here
/// }
///
/// impl FrameSource for MyCapture {
///     type Error = std::io::Error;
///
///     fn next_frame(&mut self) -> Result<Option<RgbImage>, Self::Error> {
///         // Decode and return the next frame
///         Ok(None)
///     }
/// }
/// ```
pub trait FrameSource {
    /// Error type for acquisition failures.
    type Error;

    /// Produce the next frame, or `None` at the end of the stream.
    fn next_frame(&mut self) -> Result<Option<RgbImage>, Self::Error>;
}
