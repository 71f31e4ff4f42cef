//! Ticket layout
//!
//! A ticket is a fixed-width slip: red header band with the issue date, one
//! row per saved set (label letter, six tier-colored balls, "auto" marker,
//! decorative barcode), and a footer with captions.
//!
//! Barcode bar widths are random on every render, so two renders of the same
//! sets are not pixel-identical. Only the layout is stable.

use chrono::NaiveDate;

use super::surface::{DrawOp, Surface, TextAlign, TextBaseline, TicketImage};
use crate::error::RenderError;
use crate::persistence::SavedSets;
use crate::sampler::{NumberSet, NumberSource};
use crate::settings::DownloadSettings;

pub const TITLE: &str = "로또 6/45";
pub const ISSUE_DATE_PREFIX: &str = "발행일: ";
pub const AUTO_MARKER: &str = "자동";
pub const DISCLAIMER: &str = "* 본 용지는 실제 로또 용지가 아닙니다.";
pub const GOOD_LUCK: &str = "♣ 행운을 빕니다 ♣";

pub const TITLE_FONT: &str = "bold 42px Arial";
pub const DATE_FONT: &str = "16px Arial";
pub const LABEL_FONT: &str = "bold 24px Arial";
pub const NUMBER_FONT: &str = "bold 18px Arial";
pub const MARKER_FONT: &str = "14px Arial";
pub const DISCLAIMER_FONT: &str = "12px Arial";
pub const GOOD_LUCK_FONT: &str = "bold 18px Arial";

const RED: &str = "#FF0000";
const WHITE: &str = "#FFFFFF";
const BLACK: &str = "#000000";
const DARK_GREY: &str = "#333333";
const MID_GREY: &str = "#666666";
const RULE_GREY: &str = "#CCCCCC";
const STRIP_GREY: &str = "#F5F5F5";

/// Ball radius on the ticket
pub const BALL_RADIUS: f64 = 20.0;
/// Horizontal distance between ball centers
pub const BALL_SPACING: f64 = 60.0;
/// Decorative bars per row
pub const BAR_COUNT: usize = 20;

/// Fixed ticket geometry (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TicketLayout {
    pub width: u32,
    pub header_height: u32,
    pub row_height: u32,
    pub footer_height: u32,
}

impl Default for TicketLayout {
    fn default() -> Self {
        Self {
            width: 600,
            header_height: 150,
            row_height: 140,
            footer_height: 120,
        }
    }
}

impl TicketLayout {
    /// Canvas height for `rows` sets
    pub fn height(&self, rows: usize) -> u32 {
        self.header_height + rows as u32 * self.row_height + self.footer_height
    }

    /// Top edge of row `index`
    pub fn row_top(&self, index: usize) -> f64 {
        f64::from(self.header_height) + index as f64 * f64::from(self.row_height)
    }
}

/// Row label: A..Z, then AA, AB, ...
pub fn row_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        label.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

/// Issue date as printed on the ticket
pub fn issue_date(date: NaiveDate) -> String {
    format!("{}{}", ISSUE_DATE_PREFIX, date.format("%Y.%m.%d"))
}

/// Suggested download name, e.g. `로또_20241019_3게임.png`
pub fn ticket_filename(naming: &DownloadSettings, date: NaiveDate, count: usize) -> String {
    format!(
        "{}_{}_{}{}.png",
        naming.file_prefix,
        date.format("%Y%m%d"),
        count,
        naming.file_suffix
    )
}

fn text(
    text: impl Into<String>,
    x: f64,
    y: f64,
    font: &'static str,
    color: &'static str,
    align: TextAlign,
) -> DrawOp {
    DrawOp::Text {
        text: text.into(),
        x,
        y,
        font,
        color,
        align,
        baseline: TextBaseline::Alphabetic,
    }
}

fn draw_row(
    ops: &mut Vec<DrawOp>,
    layout: &TicketLayout,
    index: usize,
    set: &NumberSet,
    jitter: &mut dyn NumberSource,
) {
    let w = f64::from(layout.width);
    let top = layout.row_top(index);

    ops.push(DrawOp::Line {
        from: (20.0, top),
        to: (w - 20.0, top),
        color: RULE_GREY,
        line_width: 1.0,
        dash: None,
    });

    // Label square
    ops.push(DrawOp::FillRect {
        x: 40.0,
        y: top + 20.0,
        w: 40.0,
        h: 40.0,
        color: RED,
    });
    ops.push(text(row_label(index), 60.0, top + 47.0, LABEL_FONT, WHITE, TextAlign::Center));

    ops.push(DrawOp::FillRect {
        x: 100.0,
        y: top + 15.0,
        w: 380.0,
        h: 50.0,
        color: STRIP_GREY,
    });

    let cy = top + 40.0;
    for (i, (number, tier)) in set.balls().enumerate() {
        let cx = 110.0 + i as f64 * BALL_SPACING + BALL_RADIUS;
        ops.push(DrawOp::Circle {
            cx,
            cy,
            radius: BALL_RADIUS,
            fill: tier.ticket_color(),
            ring: WHITE,
            ring_width: 2.0,
        });
        ops.push(DrawOp::Text {
            text: number.to_string(),
            x: cx,
            y: cy,
            font: NUMBER_FONT,
            color: WHITE,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
        });
    }

    ops.push(text(AUTO_MARKER, 500.0, top + 45.0, MARKER_FONT, MID_GREY, TextAlign::Left));

    // Cosmetic barcode, width in [1, 4)
    for i in 0..BAR_COUNT {
        ops.push(DrawOp::FillRect {
            x: 100.0 + i as f64 * 15.0,
            y: top + 80.0,
            w: jitter.next_unit() * 3.0 + 1.0,
            h: 25.0,
            color: BLACK,
        });
    }
}

/// Full op list for a ticket of `sets`
pub fn ticket_ops(
    sets: &SavedSets,
    date: NaiveDate,
    layout: &TicketLayout,
    jitter: &mut dyn NumberSource,
) -> Vec<DrawOp> {
    let w = f64::from(layout.width);
    let h = f64::from(layout.height(sets.len()));
    let mut ops = Vec::with_capacity(8 + sets.len() * (20 + BAR_COUNT));

    // Background, frame, header band
    ops.push(DrawOp::FillRect { x: 0.0, y: 0.0, w, h, color: WHITE });
    ops.push(DrawOp::StrokeRect {
        x: 10.0,
        y: 10.0,
        w: w - 20.0,
        h: h - 20.0,
        color: RED,
        line_width: 3.0,
    });
    ops.push(DrawOp::FillRect { x: 20.0, y: 20.0, w: w - 40.0, h: 80.0, color: RED });
    ops.push(text(TITLE, w / 2.0, 70.0, TITLE_FONT, WHITE, TextAlign::Center));
    ops.push(text(issue_date(date), w / 2.0, 120.0, DATE_FONT, DARK_GREY, TextAlign::Center));

    for (index, set) in sets.iter().enumerate() {
        draw_row(&mut ops, layout, index, set, jitter);
    }

    // Footer
    let bottom = h - f64::from(layout.footer_height) + 20.0;
    ops.push(DrawOp::Line {
        from: (20.0, bottom),
        to: (w - 20.0, bottom),
        color: RED,
        line_width: 2.0,
        dash: Some((5.0, 5.0)),
    });
    ops.push(text(DISCLAIMER, w / 2.0, bottom + 50.0, DISCLAIMER_FONT, MID_GREY, TextAlign::Center));
    ops.push(text(GOOD_LUCK, w / 2.0, bottom + 80.0, GOOD_LUCK_FONT, RED, TextAlign::Center));

    ops
}

/// Draw `sets` onto `surface` and export the image.
///
/// Fails with [`RenderError::Empty`] before touching the surface when there
/// is nothing to print.
pub fn render_ticket(
    sets: &SavedSets,
    date: NaiveDate,
    layout: &TicketLayout,
    jitter: &mut dyn NumberSource,
    surface: &mut dyn Surface,
) -> Result<TicketImage, RenderError> {
    if sets.is_empty() {
        return Err(RenderError::Empty);
    }

    let height = layout.height(sets.len());
    surface.begin(layout.width, height)?;
    for op in ticket_ops(sets, date, layout, jitter) {
        surface.draw(&op)?;
    }
    let image = surface.finish()?;

    log::info!(
        "Rendered ticket {}x{} with {} sets",
        image.width,
        image.height,
        sets.len()
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;
    use crate::sampler::{RngSource, ScriptedSource, Tier};

    fn sets(rows: &[[u8; 6]]) -> SavedSets {
        let mut saved = SavedSets::new();
        for nums in rows {
            saved.push(NumberSet::new(nums).unwrap()).unwrap();
        }
        saved
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn test_empty_reports_and_skips_surface() {
        let mut surface = RecordingSurface::new();
        let result = render_ticket(
            &SavedSets::new(),
            date(),
            &TicketLayout::default(),
            &mut RngSource::seeded(1),
            &mut surface,
        );
        assert_eq!(result, Err(RenderError::Empty));
        assert!(!surface.begun);
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn test_surface_unavailable() {
        let mut surface = RecordingSurface::unavailable();
        let result = render_ticket(
            &sets(&[[1, 2, 3, 4, 5, 6]]),
            date(),
            &TicketLayout::default(),
            &mut RngSource::seeded(1),
            &mut surface,
        );
        assert!(matches!(result, Err(RenderError::SurfaceUnavailable(_))));
    }

    #[test]
    fn test_height_and_labels() {
        let layout = TicketLayout::default();
        let saved = sets(&[[1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12], [40, 41, 42, 43, 44, 45]]);
        let mut surface = RecordingSurface::new();
        let image = render_ticket(&saved, date(), &layout, &mut RngSource::seeded(7), &mut surface)
            .unwrap();

        assert_eq!(image.width, 600);
        assert_eq!(image.height, 150 + 3 * 140 + 120);
        assert_eq!(surface.height, image.height);
        assert_eq!(surface.texts_in_font(LABEL_FONT), vec!["A", "B", "C"]);
        assert_eq!(surface.texts_in_font(DATE_FONT), vec!["발행일: 2024.03.07"]);
        assert_eq!(surface.texts_in_font(MARKER_FONT).len(), 3);
    }

    #[test]
    fn test_balls_sorted_and_colored() {
        let saved = sets(&[[45, 22, 12, 7, 3, 1]]);
        let mut surface = RecordingSurface::new();
        render_ticket(
            &saved,
            date(),
            &TicketLayout::default(),
            &mut RngSource::seeded(3),
            &mut surface,
        )
        .unwrap();

        let circles: Vec<_> = surface
            .circles()
            .into_iter()
            .map(|op| match op {
                DrawOp::Circle { cx, fill, .. } => (*cx, *fill),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(
            circles,
            vec![
                (130.0, Tier::A.ticket_color()),
                (190.0, Tier::A.ticket_color()),
                (250.0, Tier::A.ticket_color()),
                (310.0, Tier::B.ticket_color()),
                (370.0, Tier::C.ticket_color()),
                (430.0, Tier::E.ticket_color()),
            ]
        );

        let numerals: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, baseline: TextBaseline::Middle, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(numerals, vec!["1", "3", "7", "12", "22", "45"]);
    }

    #[test]
    fn test_bar_widths_in_range() {
        let saved = sets(&[[1, 2, 3, 4, 5, 6]]);
        let ops = ticket_ops(
            &saved,
            date(),
            &TicketLayout::default(),
            &mut ScriptedSource::with_units(vec![1], vec![0.0, 0.999]),
        );
        let bars: Vec<f64> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { w, color: "#000000", .. } => Some(*w),
                _ => None,
            })
            .collect();
        assert_eq!(bars.len(), BAR_COUNT);
        assert!(bars.iter().all(|w| (1.0..4.0).contains(w)));
    }

    #[test]
    fn test_row_label_sequence() {
        assert_eq!(row_label(0), "A");
        assert_eq!(row_label(1), "B");
        assert_eq!(row_label(25), "Z");
        assert_eq!(row_label(26), "AA");
        assert_eq!(row_label(27), "AB");
    }

    #[test]
    fn test_filename() {
        let name = ticket_filename(&DownloadSettings::default(), date(), 3);
        assert_eq!(name, "로또_20240307_3게임.png");
    }
}
