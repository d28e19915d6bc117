use super::model::{Facet, FacetProjection, Stage};
use super::{EDGE_WIDTH, LABEL_SIZE};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;

struct FacetRenderer<'a> {
    facet: &'a Facet,
    projection: &'a FacetProjection,
    width: f64,
    height: f64,
}

impl<'a> FacetRenderer<'a> {
    fn new(facet: &'a Facet, projection: &'a FacetProjection, width: f64, height: f64) -> Self {
        Self {
            facet,
            projection,
            width,
            height,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors, center: (f64, f64)) -> Result<(), cairo::Error> {
        cr.save()?;
        // facet space: origin at the top left corner, one unit per facet pixel
        cr.translate(center.0 + self.projection.offset_x, center.1);
        cr.scale(self.projection.scale_x, self.projection.scale_y);
        cr.translate(-self.width / 2.0, -self.height / 2.0);

        cr.rectangle(0.0, 0.0, self.width, self.height);
        cr.clip();

        self.draw_content(cr, colors)?;
        self.draw_shade(cr, colors)?;
        self.draw_edge(cr, colors)?;
        cr.restore()
    }

    fn draw_content(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        match &self.facet.pixbuf {
            Some(pixbuf) => self.draw_image(cr, pixbuf),
            None => self.draw_placeholder(cr, colors),
        }
    }

    fn draw_image(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint()
    }

    fn draw_placeholder(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        set_source(cr, colors.placeholder);
        cr.paint()?;

        set_source(cr, colors.label);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(LABEL_SIZE);
        let text = (self.projection.index + 1).to_string();
        if let Ok(ext) = cr.text_extents(&text) {
            cr.move_to(
                (self.width - ext.width()) / 2.0 - ext.x_bearing(),
                (self.height - ext.height()) / 2.0 - ext.y_bearing(),
            );
            cr.show_text(&text)?;
        }
        Ok(())
    }

    fn draw_shade(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        if self.projection.shade <= 0.0 {
            return Ok(());
        }
        let (r, g, b, _) = colors.shade.into_components();
        cr.set_source_rgba(r, g, b, self.projection.shade);
        cr.paint()
    }

    fn draw_edge(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        set_source(cr, colors.edge);
        cr.set_line_width(EDGE_WIDTH);
        cr.rectangle(0.0, 0.0, self.width, self.height);
        cr.stroke()
    }
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// Paints the visible facets back to front, the ring centered in the area.
pub fn draw(
    cr: &Context,
    stage: &Stage,
    colors: &ThemeColors,
    width: i32,
    height: i32,
) -> Result<(), cairo::Error> {
    let center = (width as f64 / 2.0, height as f64 / 2.0);

    for projection in stage.projections() {
        let Some(facet) = stage.facets.get(projection.index) else {
            continue;
        };
        if facet.is_placeholder() {
            log::trace!("Facet {} drawn as placeholder", projection.index);
        }
        FacetRenderer::new(facet, &projection, stage.width, stage.height).draw(cr, colors, center)?;
    }
    Ok(())
}
