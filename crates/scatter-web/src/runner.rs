use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use scatter_engine::{PixelSurface, PointerEvent, Session, SimConfig, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, Window};

use crate::image_source::HtmlImageSource;

/// Drives a `Session` against one on-page canvas.
///
/// Particles are drawn into a `PixelSurface` and presented with a single
/// `putImageData` per frame.
pub struct SessionRunner {
    session: Session,
    surface: PixelSurface,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    image: Option<HtmlImageSource>,
}

impl SessionRunner {
    pub fn new(canvas: HtmlCanvasElement, config: SimConfig, seed: u64) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            session: Session::new(config, seed),
            surface: PixelSurface::new(0, 0),
            canvas,
            context,
            image: None,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn set_image(&mut self, image: HtmlImageSource) {
        self.image = Some(image);
    }

    /// Size the canvas and the backing surface to the window's inner size.
    pub fn fit_to(&mut self, window: &Window) -> Viewport {
        let viewport = viewport_of(window);
        self.canvas.set_width(viewport.width);
        self.canvas.set_height(viewport.height);
        self.surface.resize(viewport.width, viewport.height);
        viewport
    }

    /// Refit to the window and rebuild the particle set from the loaded image.
    pub fn resample(&mut self, window: &Window) -> usize {
        let viewport = self.fit_to(window);
        match &self.image {
            Some(image) => self.session.resample(image, viewport),
            None => 0,
        }
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        self.session.handle_pointer(event);
    }

    pub fn start(&mut self) -> bool {
        self.session.start()
    }

    /// Run and present one frame. Returns whether to schedule another.
    /// Nothing is presented unless the session actually ran the frame.
    pub fn frame(&mut self) -> bool {
        let before = self.session.frames();
        let again = self.session.frame(&mut self.surface);
        if self.session.frames() != before {
            if let Err(err) = self.present() {
                log::error!("present failed: {err:?}");
            }
        }
        again
    }

    fn present(&self) -> Result<(), JsValue> {
        let (width, height) = (self.surface.width(), self.surface.height());
        if width == 0 || height == 0 {
            return Ok(());
        }
        let data = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(self.surface.as_bytes()),
            width,
            height,
        )?;
        self.context.put_image_data(&data, 0.0, 0.0)
    }

    pub fn teardown(&mut self) {
        self.session.teardown();
        self.image = None;
    }
}

fn viewport_of(window: &Window) -> Viewport {
    let dimension = |value: Result<JsValue, JsValue>| {
        value
            .ok()
            .and_then(|v| v.as_f64())
            .map(|v| v.max(0.0) as u32)
            .unwrap_or(0)
    };
    Viewport::new(dimension(window.inner_width()), dimension(window.inner_height()))
}

/// `requestAnimationFrame` loop for one runner.
///
/// The callback holds only a weak handle to the driver, so stopping the driver
/// drops the closure and nothing reschedules afterwards.
pub struct FrameDriver {
    window: Window,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
    handle: Cell<Option<i32>>,
}

impl FrameDriver {
    pub fn start(window: Window, runner: Rc<RefCell<SessionRunner>>) -> Result<Rc<Self>, JsValue> {
        let driver = Rc::new(Self {
            window,
            callback: RefCell::new(None),
            handle: Cell::new(None),
        });

        let weak: Weak<Self> = Rc::downgrade(&driver);
        let callback = Closure::<dyn FnMut()>::new(move || {
            let Some(driver) = weak.upgrade() else {
                return;
            };
            driver.handle.set(None);
            let again = runner.borrow_mut().frame();
            if again {
                if let Err(err) = driver.request() {
                    log::error!("requestAnimationFrame failed: {err:?}");
                }
            }
        });
        *driver.callback.borrow_mut() = Some(callback);

        driver.request()?;
        Ok(driver)
    }

    fn request(&self) -> Result<(), JsValue> {
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return Ok(());
        };
        let id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())?;
        self.handle.set(Some(id));
        Ok(())
    }

    /// Cancel any pending frame and release the callback. Idempotent.
    pub fn stop(&self) {
        if let Some(id) = self.handle.take() {
            if self.window.cancel_animation_frame(id).is_err() {
                log::warn!("cancelAnimationFrame({id}) failed");
            }
        }
        self.callback.borrow_mut().take();
    }
}
