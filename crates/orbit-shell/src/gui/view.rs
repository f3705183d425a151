use super::canvas::Canvas;
use super::icon::ICON_SIZE;
use super::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use orbit::geometry::Point;
use orbit::menu::NavDirection;
use orbit::render::scene::{ARROW_SIZE, SceneItem, TRIGGER_RADIUS};
use orbit::render::{EntryKind, Hit, Renderer};
use palette::Srgba;
use std::f64::consts::PI;

pub const ICON_FILL: f64 = 0.7; // icon share of the item diameter
pub const FONT_SIZE: f64 = 12.0;
pub const NAV_FONT_SIZE: f64 = 18.0;
pub const DIMMED_ICON_ALPHA: f64 = 0.4;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn fill_circle(cr: &Context, center: Point, radius: f64, color: Srgba<f64>) -> Result<(), cairo::Error> {
    set_color(cr, color);
    cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
    cr.fill()
}

fn draw_text(cr: &Context, center: Point, text: &str, size: f64) -> Result<(), cairo::Error> {
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(size);
    if let Ok(ext) = cr.text_extents(text) {
        cr.move_to(center.x - ext.width() / 2.0, center.y + ext.height() / 2.0);
        cr.show_text(text)?;
    }
    Ok(())
}

fn nav_glyph(direction: NavDirection) -> &'static str {
    match direction {
        NavDirection::Prev => "‹",
        NavDirection::Next => "›",
    }
}

/// Strips markup tags for cairo's plain text drawing.
fn plain_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

struct ItemRenderer<'a> {
    item: &'a SceneItem,
    center: Point,
    hovered: bool,
    pixbuf: Option<&'a Pixbuf>,
}

impl ItemRenderer<'_> {
    fn radius(&self) -> f64 {
        self.item.size() / 2.0
    }

    fn color(&self, colors: &ThemeColors) -> Srgba<f64> {
        if self.hovered {
            colors.hovered
        } else if self.item.active {
            colors.active
        } else if self.item.dimmed {
            colors.dimmed
        } else if !self.item.kind.is_item() {
            colors.nav
        } else {
            colors.default
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors, label_hover: bool) -> Result<(), cairo::Error> {
        fill_circle(cr, self.center, self.radius(), self.color(colors))?;
        set_color(cr, colors.text);

        match (self.item.kind, self.pixbuf) {
            (EntryKind::Nav(direction), _) => {
                draw_text(cr, self.center, nav_glyph(direction), NAV_FONT_SIZE)
            }
            (EntryKind::Item { .. }, _) if self.item.content.is_some() => {
                let content = self.item.content.as_deref().unwrap_or_default();
                draw_text(cr, self.center, &plain_text(content), FONT_SIZE)
            }
            (EntryKind::Item { .. }, Some(pixbuf)) => {
                self.draw_icon(cr, pixbuf)?;
                if label_hover && self.hovered {
                    let below = self.center.translate(0.0, self.radius() + FONT_SIZE);
                    set_color(cr, colors.text);
                    draw_text(cr, below, &self.item.label, FONT_SIZE)?;
                }
                Ok(())
            }
            (EntryKind::Item { .. }, None) => {
                draw_text(cr, self.center, &self.item.label, FONT_SIZE)
            }
        }
    }

    fn draw_icon(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        let icon_scale = (self.radius() * 2.0 * ICON_FILL) / ICON_SIZE as f64;
        let (iw, ih) = (
            pixbuf.width() as f64 * icon_scale,
            pixbuf.height() as f64 * icon_scale,
        );

        cr.save()?;
        cr.translate(self.center.x - iw / 2.0, self.center.y - ih / 2.0);
        cr.scale(icon_scale, icon_scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        if self.item.dimmed && !self.hovered {
            cr.paint_with_alpha(DIMMED_ICON_ALPHA)?;
        } else {
            cr.paint()?;
        }
        cr.restore()
    }
}

fn draw_trigger(cr: &Context, canvas: &Canvas, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let scene = canvas.scene();
    let (active, dimmed) = scene.trigger();
    let color = match (canvas.hover() == Some(Hit::Trigger), active && !dimmed) {
        (true, _) => colors.hovered,
        (false, true) => colors.active,
        (false, false) => colors.trigger,
    };
    fill_circle(cr, scene.origin(), TRIGGER_RADIUS, color)
}

fn draw_arrows(cr: &Context, canvas: &Canvas, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let scene = canvas.scene();
    let Some(arrows) = scene.arrows() else {
        return Ok(());
    };

    let shown = [
        (NavDirection::Prev, arrows.has_prev),
        (NavDirection::Next, arrows.has_next),
    ];
    for (direction, _) in shown.into_iter().filter(|(_, on)| *on) {
        let center = scene.arrow_center(direction);
        let hovered = matches!(canvas.hover(), Some(Hit::Arrow { direction: d, .. }) if d == direction);
        let color = if hovered { colors.hovered } else { colors.nav };
        fill_circle(cr, center, ARROW_SIZE / 2.0, color)?;
        set_color(cr, colors.text);
        draw_text(cr, center, nav_glyph(direction), NAV_FONT_SIZE)?;
    }
    Ok(())
}

fn is_hovered(hover: Option<Hit>, depth: usize, item: &SceneItem) -> bool {
    match (hover, item.kind) {
        (Some(Hit::Item { depth: d, id }), EntryKind::Item { id: item_id, .. }) => {
            d == depth && id == item_id
        }
        (Some(Hit::Nav { depth: d, direction }), EntryKind::Nav(nav)) => {
            d == depth && direction == nav
        }
        _ => false,
    }
}

pub fn draw(
    cr: &Context,
    canvas: &Canvas,
    colors: &ThemeColors,
    label_hover: bool,
) -> Result<(), cairo::Error> {
    let scene = canvas.scene();
    draw_trigger(cr, canvas, colors)?;

    for level in scene.levels() {
        for item in &level.items {
            ItemRenderer {
                item,
                center: scene.origin().offset_by(item.offset),
                hovered: is_hovered(canvas.hover(), level.depth, item),
                pixbuf: item.icon.as_deref().and_then(|name| canvas.icon(name)),
            }
            .draw(cr, colors, label_hover)?;
        }
    }

    draw_arrows(cr, canvas, colors)
}
