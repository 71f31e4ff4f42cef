//! Browser adapters (wasm32 only)

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::NaiveDate;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlAnchorElement, HtmlCanvasElement, HtmlDocument,
    Window,
};

use crate::app::{Host, Scheduler, TimerHandle, TimerKind};
use crate::error::{RenderError, StoreError};
use crate::persistence::CookieJar;
use crate::renderer::{DrawOp, Surface, TicketImage};

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

/// `document.cookie`
pub struct DocumentCookies {
    document: HtmlDocument,
}

impl DocumentCookies {
    pub fn new(document: &Document) -> Option<Self> {
        let document = document.clone().dyn_into::<HtmlDocument>().ok()?;
        Some(Self { document })
    }
}

impl CookieJar for DocumentCookies {
    fn read(&self) -> Result<String, StoreError> {
        self.document
            .cookie()
            .map_err(|e| StoreError::Read(js_error(e)))
    }

    fn write(&mut self, cookie: &str) -> Result<(), StoreError> {
        self.document
            .set_cookie(cookie)
            .map_err(|e| StoreError::Write(js_error(e)))
    }
}

/// Callback invoked when a browser timer fires
pub type TimerCallback = Rc<dyn Fn(TimerKind, TimerHandle)>;

/// Late-bound route from browser timers back to the app.
///
/// The app owns the scheduler, so the callback can only be installed once
/// the app exists.
#[derive(Clone, Default)]
pub struct TimerDispatch(Rc<RefCell<Option<TimerCallback>>>);

impl TimerDispatch {
    pub fn set(&self, callback: TimerCallback) {
        *self.0.borrow_mut() = Some(callback);
    }

    fn fire(&self, kind: TimerKind, handle: TimerHandle) {
        // Release the slot before calling out; the callback may schedule
        let callback = self.0.borrow().clone();
        match callback {
            Some(callback) => callback(kind, handle),
            None => log::warn!("Timer {:?} fired before dispatch was set", kind),
        }
    }
}

/// `setTimeout`/`setInterval` scheduler
pub struct BrowserScheduler {
    window: Window,
    dispatch: TimerDispatch,
    next_id: u64,
    /// Browser ids of one-shot timers that have not fired yet
    timeouts: Rc<RefCell<HashMap<TimerHandle, i32>>>,
    /// Repeating timers keep their closure alive until cancelled
    intervals: HashMap<TimerHandle, (i32, Closure<dyn FnMut()>)>,
}

impl BrowserScheduler {
    pub fn new(window: Window, dispatch: TimerDispatch) -> Self {
        Self {
            window,
            dispatch,
            next_id: 0,
            timeouts: Rc::new(RefCell::new(HashMap::new())),
            intervals: HashMap::new(),
        }
    }

    fn next_handle(&mut self) -> TimerHandle {
        self.next_id += 1;
        TimerHandle(self.next_id)
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule_once(&mut self, kind: TimerKind, delay_ms: u32) -> TimerHandle {
        let handle = self.next_handle();
        let dispatch = self.dispatch.clone();
        let timeouts = Rc::clone(&self.timeouts);
        let callback = Closure::once_into_js(move || {
            timeouts.borrow_mut().remove(&handle);
            dispatch.fire(kind, handle);
        });

        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms as i32,
            ) {
            Ok(id) => {
                self.timeouts.borrow_mut().insert(handle, id);
            }
            Err(e) => log::error!("setTimeout failed for {:?}: {}", kind, js_error(e)),
        }
        handle
    }

    fn schedule_repeating(&mut self, kind: TimerKind, period_ms: u32) -> TimerHandle {
        let handle = self.next_handle();
        let dispatch = self.dispatch.clone();
        let callback = Closure::<dyn FnMut()>::new(move || dispatch.fire(kind, handle));

        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                period_ms as i32,
            ) {
            Ok(id) => {
                self.intervals.insert(handle, (id, callback));
            }
            Err(e) => log::error!("setInterval failed for {:?}: {}", kind, js_error(e)),
        }
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let timeout = self.timeouts.borrow_mut().remove(&handle);
        if let Some(id) = timeout {
            self.window.clear_timeout_with_handle(id);
        } else if let Some((id, _closure)) = self.intervals.remove(&handle) {
            self.window.clear_interval_with_handle(id);
        }
    }
}

/// Offscreen 2D canvas
pub struct CanvasSurface {
    document: Document,
    canvas: Option<(HtmlCanvasElement, CanvasRenderingContext2d)>,
}

impl CanvasSurface {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            canvas: None,
        }
    }

    fn context(&self) -> Result<&CanvasRenderingContext2d, RenderError> {
        self.canvas
            .as_ref()
            .map(|(_, ctx)| ctx)
            .ok_or_else(|| RenderError::SurfaceUnavailable("canvas not started".into()))
    }
}

impl Surface for CanvasSurface {
    fn begin(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let unavailable = |e: JsValue| RenderError::SurfaceUnavailable(js_error(e));

        let canvas: HtmlCanvasElement = self
            .document
            .create_element("canvas")
            .map_err(unavailable)?
            .dyn_into()
            .map_err(|_| RenderError::SurfaceUnavailable("not a canvas".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(unavailable)?
            .ok_or_else(|| RenderError::SurfaceUnavailable("no 2d context".into()))?
            .dyn_into()
            .map_err(|_| RenderError::SurfaceUnavailable("unexpected context type".into()))?;

        self.canvas = Some((canvas, ctx));
        Ok(())
    }

    fn draw(&mut self, op: &DrawOp) -> Result<(), RenderError> {
        let ctx = self.context()?;
        let export = |e: JsValue| RenderError::Export(js_error(e));

        match op {
            DrawOp::FillRect { x, y, w, h, color } => {
                ctx.set_fill_style_str(color);
                ctx.fill_rect(*x, *y, *w, *h);
            }
            DrawOp::StrokeRect {
                x,
                y,
                w,
                h,
                color,
                line_width,
            } => {
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(*line_width);
                ctx.stroke_rect(*x, *y, *w, *h);
            }
            DrawOp::Line {
                from,
                to,
                color,
                line_width,
                dash,
            } => {
                let pattern = js_sys::Array::new();
                if let Some((on, off)) = dash {
                    pattern.push(&JsValue::from_f64(*on));
                    pattern.push(&JsValue::from_f64(*off));
                }
                ctx.set_line_dash(&pattern).map_err(export)?;
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(*line_width);
                ctx.begin_path();
                ctx.move_to(from.0, from.1);
                ctx.line_to(to.0, to.1);
                ctx.stroke();
                if dash.is_some() {
                    ctx.set_line_dash(&js_sys::Array::new()).map_err(export)?;
                }
            }
            DrawOp::Circle {
                cx,
                cy,
                radius,
                fill,
                ring,
                ring_width,
            } => {
                ctx.begin_path();
                ctx.arc(*cx, *cy, *radius, 0.0, std::f64::consts::TAU)
                    .map_err(export)?;
                ctx.set_fill_style_str(fill);
                ctx.fill();
                ctx.set_stroke_style_str(ring);
                ctx.set_line_width(*ring_width);
                ctx.stroke();
            }
            DrawOp::Text {
                text,
                x,
                y,
                font,
                color,
                align,
                baseline,
            } => {
                ctx.set_font(font);
                ctx.set_fill_style_str(color);
                ctx.set_text_align(align.as_str());
                ctx.set_text_baseline(baseline.as_str());
                ctx.fill_text(text, *x, *y).map_err(export)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<TicketImage, RenderError> {
        let (canvas, _) = self
            .canvas
            .take()
            .ok_or_else(|| RenderError::SurfaceUnavailable("canvas not started".into()))?;
        let href = canvas
            .to_data_url_with_type("image/png")
            .map_err(|e| RenderError::Export(js_error(e)))?;
        Ok(TicketImage {
            width: canvas.width(),
            height: canvas.height(),
            href,
        })
    }
}

/// Page host: local date, canvas, `<a download>` click
pub struct BrowserHost {
    document: Document,
    surface: CanvasSurface,
}

impl BrowserHost {
    pub fn new(document: Document) -> Self {
        Self {
            surface: CanvasSurface::new(document.clone()),
            document,
        }
    }
}

impl Host for BrowserHost {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    fn surface(&mut self) -> &mut dyn Surface {
        &mut self.surface
    }

    fn offer_download(&mut self, image: &TicketImage, filename: &str) -> Result<(), RenderError> {
        let export = |e: JsValue| RenderError::Export(js_error(e));

        let anchor: HtmlAnchorElement = self
            .document
            .create_element("a")
            .map_err(export)?
            .dyn_into()
            .map_err(|_| RenderError::Export("not an anchor".into()))?;
        anchor.set_href(&image.href);
        anchor.set_download(filename);

        let body = self
            .document
            .body()
            .ok_or_else(|| RenderError::Export("document has no body".into()))?;
        body.append_child(&anchor).map_err(export)?;
        anchor.click();
        body.remove_child(&anchor).map_err(export)?;
        Ok(())
    }
}
