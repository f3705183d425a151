use crate::events::AppEvent;
use crate::gui::canvas::Canvas;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::{view, window};
use crate::sys::launch;
use gtk::prelude::*;
use gtk4 as gtk;
use orbit::config::{self, Config};
use orbit::events::MenuEvent;
use orbit::geometry::{Point, Rect};
use orbit::menu::{ItemId, Menu, MenuAction};
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub const ARROW_REFRESH_DELAY: Duration = Duration::from_millis(50);

/// The menu engine together with the renderer it draws into.
pub struct Shell {
    pub menu: Menu,
    pub canvas: Canvas,
}

impl Shell {
    pub fn new(config: &Config) -> Self {
        Self {
            menu: Menu::new(config),
            canvas: Canvas::new(),
        }
    }

    pub fn handle(&mut self, event: MenuEvent) -> MenuAction {
        self.menu.handle(event, &mut self.canvas)
    }

    /// Opens the menu around `origin`, reopening it if it was already shown.
    pub fn show(&mut self, origin: Point, viewport: Rect) {
        self.menu.close(&mut self.canvas);
        self.canvas.place(origin, viewport);
        self.menu.open(&mut self.canvas);
    }

    pub fn run_deferred(&mut self) -> bool {
        self.menu.run_deferred(&mut self.canvas)
    }

    pub fn reconfigure(&mut self, config: &Config) {
        self.menu.reconfigure(config, &mut self.canvas);
    }
}

pub struct AppModel {
    pub shell: Rc<RefCell<Shell>>,
    pub visible: bool,
    /// Pointer is over something the menu drew.
    pub inside: bool,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    Toggle,
    Click(u32, Point),
    CursorMove(Point),
    CursorLeave,
    Resize(i32, i32),
    RunDeferred,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::Toggle => AppMsg::Toggle,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Shell, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Orbit"),
            #[watch]
            set_visible: model.visible,
            #[watch]
            set_opacity: if model.visible { 1.0 } else { 0.0 },
            add_css_class: "orbit-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Hide);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "orbit-drawing-area",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width, height));
                },

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::CursorMove(Point::new(x, y)));
                    },
                    connect_leave[sender] => move |_| {
                        sender.input(AppMsg::CursorLeave);
                    }
                },

                add_controller = gtk::GestureClick {
                    set_button: 0, // all buttons
                    connect_released[sender] => move |gesture, _, x, y| {
                        sender.input(AppMsg::Click(gesture.current_button(), Point::new(x, y)));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (shell, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let model = AppModel {
            shell: Rc::new(RefCell::new(shell)),
            visible: false,
            inside: false,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let shell_draw = model.shell.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let shell = shell_draw.borrow();
                let label_hover = shell.menu.settings().label_hover;
                if let Err(e) = view::draw(cr, &shell.canvas, &colors, label_hover) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => self.show(&sender),
            AppMsg::Hide => self.hide(),
            AppMsg::Toggle if self.visible => self.hide(),
            AppMsg::Toggle => self.show(&sender),
            AppMsg::Click(button, point) => {
                if self.visible {
                    self.click(button, point, &sender);
                }
            }
            AppMsg::CursorMove(point) => {
                if self.visible {
                    self.cursor_move(point);
                }
            }
            AppMsg::CursorLeave => {
                self.inside = false;
                if self.shell.borrow_mut().canvas.set_hover(None) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Resize(width, height) => {
                let mut shell = self.shell.borrow_mut();
                shell
                    .canvas
                    .set_viewport(Rect::new(0.0, 0.0, width as f64, height as f64));
                if shell.handle(MenuEvent::ViewportResized).changed {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::RunDeferred => {
                if self.shell.borrow_mut().run_deferred() {
                    log::debug!("Deferred work moved items");
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.shell.borrow_mut().reconfigure(&new_config);
                    log::info!("Configuration reloaded");
                    self.schedule_deferred(&sender);
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}

impl AppModel {
    fn show(&mut self, sender: &ComponentSender<Self>) {
        self.visible = true;
        self.inside = false;

        let viewport = window::monitor_bounds(&self.root).unwrap_or_else(|| {
            Rect::new(
                0.0,
                0.0,
                self.drawing_area.width() as f64,
                self.drawing_area.height() as f64,
            )
        });
        let origin = window::get_cursor_position(&self.root).unwrap_or(viewport.center());

        self.shell.borrow_mut().show(origin, viewport);
        self.schedule_deferred(sender);
    }

    fn hide(&mut self) {
        self.shell.borrow_mut().handle(MenuEvent::Close);
        self.visible = false;
    }

    fn click(&mut self, button: u32, point: Point, sender: &ComponentSender<Self>) {
        let (action, open) = {
            let mut shell = self.shell.borrow_mut();
            // secondary button dismisses
            let event = match shell.canvas.hit_test(point) {
                _ if button == 3 => MenuEvent::Close,
                Some(hit) => hit.event(),
                None => MenuEvent::ClickOutside,
            };
            let action = shell.handle(event);
            (action, shell.menu.is_open())
        };

        if let Some(item) = action.invoked {
            self.launch(item);
            self.hide();
            return;
        }
        if !open {
            self.visible = false;
            return;
        }
        self.schedule_deferred(sender);
    }

    fn cursor_move(&mut self, point: Point) {
        let mut shell = self.shell.borrow_mut();
        let hit = shell.canvas.hit_test(point);
        let mut redraw = shell.canvas.set_hover(hit);

        let inside = hit.is_some();
        if inside && !self.inside {
            redraw |= shell.handle(MenuEvent::ViewportReentry).changed;
        }
        self.inside = inside;

        if redraw {
            self.drawing_area.queue_draw();
        }
    }

    fn launch(&self, item: ItemId) {
        let shell = self.shell.borrow();
        let Some(node) = shell.menu.tree().get(item) else {
            return;
        };
        if let Err(e) = launch::activate(&node.spec) {
            log::error!("Failed to activate '{}': {:#}", node.label(), e);
        }
    }

    /// Lets the renderer commit the new layout before the engine measures it.
    fn schedule_deferred(&self, sender: &ComponentSender<Self>) {
        self.drawing_area.queue_draw();

        let shell = self.shell.borrow();
        if !shell.menu.has_pending() {
            return;
        }

        let sender = sender.clone();
        if shell.menu.settings().menu_type.is_corner() {
            glib::timeout_add_local_once(ARROW_REFRESH_DELAY, move || {
                sender.input(AppMsg::RunDeferred);
            });
        } else {
            glib::idle_add_local_once(move || {
                sender.input(AppMsg::RunDeferred);
            });
        }
    }
}
