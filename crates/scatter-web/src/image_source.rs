use scatter_engine::{raster_fits, RasterSource, RgbaRaster};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

/// A loaded `<img>` rasterized through a throwaway off-screen canvas.
pub struct HtmlImageSource {
    image: HtmlImageElement,
    document: Document,
}

impl HtmlImageSource {
    pub fn new(image: HtmlImageElement, document: Document) -> Self {
        Self { image, document }
    }

    fn offscreen(&self, width: u32, height: u32) -> Option<CanvasRenderingContext2d> {
        let canvas = self
            .document
            .create_element("canvas")
            .ok()?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        canvas.set_width(width);
        canvas.set_height(height);
        canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()
    }
}

impl RasterSource for HtmlImageSource {
    fn dimensions(&self) -> (u32, u32) {
        (self.image.natural_width(), self.image.natural_height())
    }

    fn rasterize(&self, width: u32, height: u32) -> Option<RgbaRaster> {
        if !raster_fits(width, height) {
            return None;
        }
        let ctx = self.offscreen(width, height)?;
        let (w, h) = (width as f64, height as f64);
        ctx.draw_image_with_html_image_element_and_dw_and_dh(&self.image, 0.0, 0.0, w, h)
            .ok()?;
        let data = ctx.get_image_data(0.0, 0.0, w, h).ok()?;
        RgbaRaster::new(width, height, data.data().0)
    }
}
