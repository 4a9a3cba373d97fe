use std::cell::RefCell;
use std::rc::Rc;

use scatter_engine::{PointerEvent, SimConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, HtmlCanvasElement, HtmlImageElement, MouseEvent, TouchEvent, Window};

use crate::image_source::HtmlImageSource;
use crate::listeners::Listener;
use crate::runner::{FrameDriver, SessionRunner};

/// Everything one mounted image owns on the page. Dropping it tears the
/// session down: the frame loop, the listeners and the pending image load.
pub struct Mount {
    runner: Rc<RefCell<SessionRunner>>,
    frames: Rc<RefCell<Option<Rc<FrameDriver>>>>,
    image: HtmlImageElement,
    onload: Option<Closure<dyn FnMut()>>,
    onerror: Option<Closure<dyn FnMut()>>,
    listeners: Vec<Listener>,
}

impl Mount {
    pub fn new(canvas_id: &str, image_url: &str, config: SimConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()?;

        let mut runner = SessionRunner::new(canvas, config, session_seed())?;
        runner.fit_to(&window);
        let runner = Rc::new(RefCell::new(runner));
        let frames = Rc::new(RefCell::new(None));

        let image = HtmlImageElement::new()?;
        image.set_cross_origin(cross_origin_for(image_url));
        let onload = on_image_load(&window, &document, &image, &runner, &frames);
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        let url = image_url.to_string();
        let onerror = Closure::<dyn FnMut()>::new(move || {
            log::error!("image failed to load: {}", abbreviate(&url));
        });
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        let listeners = attach_listeners(&window, &runner)?;
        image.set_src(image_url);
        log::info!("mounted on #{canvas_id}");

        Ok(Self {
            runner,
            frames,
            image,
            onload: Some(onload),
            onerror: Some(onerror),
            listeners,
        })
    }

    pub fn config(&self) -> SimConfig {
        self.runner.borrow().session().config().clone()
    }

    pub fn particle_count(&self) -> usize {
        self.runner.borrow().session().particle_count()
    }

    fn teardown(&mut self) {
        self.image.set_onload(None);
        self.image.set_onerror(None);
        self.onload = None;
        self.onerror = None;
        if let Some(driver) = self.frames.borrow_mut().take() {
            driver.stop();
        }
        self.listeners.clear();
        self.runner.borrow_mut().teardown();
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn on_image_load(
    window: &Window,
    document: &Document,
    image: &HtmlImageElement,
    runner: &Rc<RefCell<SessionRunner>>,
    frames: &Rc<RefCell<Option<Rc<FrameDriver>>>>,
) -> Closure<dyn FnMut()> {
    let window = window.clone();
    let document = document.clone();
    let image = image.clone();
    let runner = Rc::clone(runner);
    let frames = Rc::clone(frames);
    Closure::<dyn FnMut()>::new(move || {
        let started = {
            let mut r = runner.borrow_mut();
            r.set_image(HtmlImageSource::new(image.clone(), document.clone()));
            r.resample(&window);
            r.start()
        };
        if !started || frames.borrow().is_some() {
            return;
        }
        match FrameDriver::start(window.clone(), Rc::clone(&runner)) {
            Ok(driver) => *frames.borrow_mut() = Some(driver),
            Err(err) => log::error!("frame loop failed to start: {err:?}"),
        }
    })
}

fn attach_listeners(window: &Window, runner: &Rc<RefCell<SessionRunner>>) -> Result<Vec<Listener>, JsValue> {
    let target: &EventTarget = window.as_ref();
    let mut listeners = Vec::with_capacity(5);

    let r = Rc::clone(runner);
    listeners.push(Listener::attach(target, "mousemove", move |event: Event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            r.borrow_mut().pointer(PointerEvent::Move {
                x: mouse.client_x() as f32,
                y: mouse.client_y() as f32,
            });
        }
    })?);

    let r = Rc::clone(runner);
    listeners.push(Listener::attach_blocking(target, "touchmove", move |event: Event| {
        event.prevent_default();
        let Some(touch) = event
            .dyn_ref::<TouchEvent>()
            .and_then(|touch| touch.touches().get(0))
        else {
            return;
        };
        r.borrow_mut().pointer(PointerEvent::TouchMove {
            x: touch.client_x() as f32,
            y: touch.client_y() as f32,
        });
    })?);

    let r = Rc::clone(runner);
    listeners.push(Listener::attach(target, "touchend", move |_| {
        r.borrow_mut().pointer(PointerEvent::TouchEnd);
    })?);

    let r = Rc::clone(runner);
    listeners.push(Listener::attach(target, "mouseout", move |_| {
        r.borrow_mut().pointer(PointerEvent::Leave);
    })?);

    let r = Rc::clone(runner);
    let w = window.clone();
    listeners.push(Listener::attach(target, "resize", move |_| {
        let mut runner = r.borrow_mut();
        if runner.has_image() {
            runner.resample(&w);
        } else {
            runner.fit_to(&w);
        }
    })?);

    Ok(listeners)
}

fn session_seed() -> u64 {
    let high = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let low = js_sys::Date::now() as u64;
    (high << 32) ^ low
}

/// Remote images are requested with CORS so the off-screen canvas stays
/// readable. Inline `data:` and `blob:` URLs are same-origin already.
fn cross_origin_for(url: &str) -> Option<&'static str> {
    let scheme = url.split_once(':').map(|(scheme, _)| scheme.to_ascii_lowercase());
    match scheme.as_deref() {
        Some("data") | Some("blob") => None,
        _ => Some("anonymous"),
    }
}

/// Data URLs can be megabytes long; keep log lines short.
fn abbreviate(url: &str) -> &str {
    match url.char_indices().nth(64) {
        Some((end, _)) => &url[..end],
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_images_request_cors() {
        assert_eq!(cross_origin_for("https://cdn.example.com/cat.png"), Some("anonymous"));
        assert_eq!(cross_origin_for("cat.png"), Some("anonymous"));
        assert_eq!(cross_origin_for("/img/cat.png"), Some("anonymous"));
    }

    #[test]
    fn inline_images_skip_cors() {
        assert_eq!(cross_origin_for("data:image/png;base64,AAAA"), None);
        assert_eq!(cross_origin_for("DATA:image/png;base64,AAAA"), None);
        assert_eq!(cross_origin_for("blob:https://example.com/1234"), None);
    }

    #[test]
    fn abbreviate_keeps_short_urls() {
        assert_eq!(abbreviate("cat.png"), "cat.png");
        let long = format!("data:image/png;base64,{}", "A".repeat(500));
        assert_eq!(abbreviate(&long).len(), 64);
        assert!(long.starts_with(abbreviate(&long)));
    }
}
