//! Host environment seam: today's date, a drawing surface, file downloads

use chrono::NaiveDate;

use crate::error::RenderError;
use crate::renderer::{RecordingSurface, Surface, TicketImage};

/// What the state machine needs from its surroundings
pub trait Host {
    /// Local calendar date for the ticket and its filename
    fn today(&self) -> NaiveDate;

    /// Surface the next ticket is drawn on
    fn surface(&mut self) -> &mut dyn Surface;

    /// Hand the image to the user under `filename`
    fn offer_download(&mut self, image: &TicketImage, filename: &str) -> Result<(), RenderError>;
}

/// Host without a browser: records tickets and downloads in memory
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    pub today: NaiveDate,
    pub surface: RecordingSurface,
    /// `(filename, image)` per completed download
    pub downloads: Vec<(String, TicketImage)>,
}

impl HeadlessHost {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            surface: RecordingSurface::new(),
            downloads: Vec::new(),
        }
    }

    /// Local date of the machine
    pub fn local() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }
}

impl Host for HeadlessHost {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn surface(&mut self) -> &mut dyn Surface {
        &mut self.surface
    }

    fn offer_download(&mut self, image: &TicketImage, filename: &str) -> Result<(), RenderError> {
        self.downloads.push((filename.to_string(), image.clone()));
        Ok(())
    }
}
