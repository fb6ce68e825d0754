//! `TileMapWidget` - the browser entry point.
//!
//! Mounting a widget:
//! - resolves the CSV URL for the current page and fetches it
//! - observes the mount point until it scrolls into view
//! - once both have happened, waits [`RENDER_DELAY_MS`], builds the chart
//!   into `chartIdx<idx>` and fades it in
//!
//! Fetch failures go to the browser console and leave the widget empty.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Blob, BlobPropertyBag, Document, HtmlAnchorElement, HtmlCanvasElement, HtmlElement,
    MouseEvent, ResizeObserver, Url,
};

use crate::chart_spec::{build_chart_spec, ChartSpec, RENDER_DELAY_MS};
use crate::error::{Result, TileMapError};
use crate::export::{data_table_csv, export_filename, MenuItem};
use crate::format::Tooltip;
use crate::normalize::load_dataset;
use crate::orchestrator::{ChartMount, Construction, Orchestrator};
use crate::render::{CanvasRenderer, Frame};
use crate::source::{fetch_csv, DataSource};
use crate::types::{ChartOptions, DataSet};
use crate::visibility::{IntersectionVisibility, VisibilityGate};

/// Width used before the container has been laid out.
const FALLBACK_WIDTH: f64 = 800.0;

fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| TileMapError::Dom("no document".into()))
}

fn create_element<T: JsCast>(doc: &Document, tag: &str) -> Result<T> {
    doc.create_element(tag)
        .map_err(|e| TileMapError::Dom(format!("create <{tag}>: {e:?}")))?
        .dyn_into::<T>()
        .map_err(|_| TileMapError::Dom(format!("<{tag}> has unexpected type")))
}

fn set_style(el: &HtmlElement, css: &[(&str, &str)]) {
    let style = el.style();
    for (name, value) in css {
        let _ = style.set_property(name, value);
    }
}

fn dom_err(what: &str) -> impl Fn(JsValue) -> TileMapError + '_ {
    move |e| TileMapError::Dom(format!("{what}: {e:?}"))
}

/// Trigger a browser download of `href` as `filename`.
fn download(href: &str, filename: &str) -> Result<()> {
    let doc = document()?;
    let anchor: HtmlAnchorElement = create_element(&doc, "a")?;
    anchor.set_href(href);
    anchor.set_download(filename);
    let body = doc.body().ok_or_else(|| TileMapError::Dom("no body".into()))?;
    body.append_child(&anchor).map_err(dom_err("append anchor"))?;
    anchor.click();
    anchor.remove();
    Ok(())
}

fn download_csv(data: &DataSet, filename: &str) -> Result<()> {
    let parts = js_sys::Array::of1(&JsValue::from_str(&data_table_csv(data)));
    let options = BlobPropertyBag::new();
    options.set_type("text/csv;charset=utf-8");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(dom_err("create blob"))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(dom_err("object url"))?;
    let result = download(&url, filename);
    let _ = Url::revoke_object_url(&url);
    result
}

/// Canvas, renderer and the current frame for one mounted chart.
struct ChartView {
    canvas: HtmlCanvasElement,
    tooltip: HtmlElement,
    renderer: CanvasRenderer,
    spec: ChartSpec,
    frame: Frame,
    dpr: f32,
}

impl ChartView {
    fn repaint(&mut self, width: f64) -> Result<()> {
        self.frame = Frame::new(&self.spec, width);
        self.renderer
            .set_canvas_css_size(self.frame.layout.width, self.frame.layout.height);
        self.frame.paint(&mut self.renderer, self.dpr)
    }

    fn show_tooltip(&self, event: &MouseEvent) {
        let rect = self.canvas.get_bounding_client_rect();
        let x = f64::from(event.client_x()) - rect.left();
        let y = f64::from(event.client_y()) - rect.top();
        let hit = self
            .frame
            .layout
            .hit_test(x, y)
            .and_then(|i| self.spec.tiles.get(i));
        match hit {
            Some(tile) => {
                let tip = Tooltip {
                    header: tile.tooltip_header.clone(),
                    body: tile.tooltip_body.clone(),
                };
                self.tooltip.set_inner_html(&tip.to_html());
                let left = format!("{}px", x + 12.0);
                let top = format!("{}px", y + 12.0);
                set_style(
                    &self.tooltip,
                    &[("display", "block"), ("left", left.as_str()), ("top", top.as_str())],
                );
            }
            None => self.hide_tooltip(),
        }
    }

    fn hide_tooltip(&self) {
        set_style(&self.tooltip, &[("display", "none")]);
    }
}

/// A constructed chart and the listeners keeping it interactive.
struct MountedChart {
    container: HtmlElement,
    view: Rc<RefCell<ChartView>>,
    _mouse_closures: Vec<Closure<dyn FnMut(MouseEvent)>>,
    _menu_closures: Vec<Closure<dyn FnMut(MouseEvent)>>,
    resize: Option<(ResizeObserver, Closure<dyn FnMut(js_sys::Array)>)>,
}

impl MountedChart {
    fn build(container: HtmlElement, spec: ChartSpec, data: DataSet) -> Result<Self> {
        let doc = document()?;
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        #[allow(clippy::cast_possible_truncation)]
        let dpr = dpr as f32;

        set_style(&container, &[("position", "relative")]);
        let canvas: HtmlCanvasElement = create_element(&doc, "canvas")?;
        set_style(&canvas, &[("display", "block")]);
        container
            .append_child(&canvas)
            .map_err(dom_err("append canvas"))?;

        let tooltip: HtmlElement = create_element(&doc, "div")?;
        tooltip.set_class_name("tooltip");
        set_style(
            &tooltip,
            &[
                ("position", "absolute"),
                ("display", "none"),
                ("pointer-events", "none"),
                ("background", "#fff"),
                ("border", "1px solid #ccc"),
                ("padding", "4px 8px"),
            ],
        );
        container
            .append_child(&tooltip)
            .map_err(dom_err("append tooltip"))?;

        let mut renderer = CanvasRenderer::new(canvas.clone())?;
        renderer.preload_image(spec.logo.src)?;
        let logo = renderer.image(spec.logo.src).cloned();

        let width = match f64::from(container.client_width()) {
            w if w > 0.0 => w,
            _ => FALLBACK_WIDTH,
        };
        let menu_closures = Self::build_menu(&doc, &container, &canvas, &spec, data)?;

        let frame = Frame::new(&spec, width);
        let view = Rc::new(RefCell::new(ChartView {
            canvas: canvas.clone(),
            tooltip,
            renderer,
            spec,
            frame,
            dpr,
        }));
        view.borrow_mut().repaint(width)?;

        // Repaint once the logo has decoded.
        if let Some(image) = logo {
            let weak = Rc::downgrade(&view);
            spawn_local(async move {
                if JsFuture::from(image.decode()).await.is_err() {
                    return;
                }
                if let Some(view) = weak.upgrade() {
                    let mut v = view.borrow_mut();
                    let width = v.frame.layout.width;
                    let _ = v.repaint(width);
                }
            });
        }

        let mut mouse_closures = Vec::new();
        {
            let view = Rc::clone(&view);
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                view.borrow().show_tooltip(&event);
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
                .map_err(dom_err("mousemove listener"))?;
            mouse_closures.push(closure);
        }
        {
            let view = Rc::clone(&view);
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                view.borrow().hide_tooltip();
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())
                .map_err(dom_err("mouseleave listener"))?;
            mouse_closures.push(closure);
        }

        let resize = Self::observe_resize(&container, &view);

        Ok(Self {
            container,
            view,
            _mouse_closures: mouse_closures,
            _menu_closures: menu_closures,
            resize,
        })
    }

    fn observe_resize(
        container: &HtmlElement,
        view: &Rc<RefCell<ChartView>>,
    ) -> Option<(ResizeObserver, Closure<dyn FnMut(js_sys::Array)>)> {
        let weak: Weak<RefCell<ChartView>> = Rc::downgrade(view);
        let target = container.clone();
        let closure = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            let Some(view) = weak.upgrade() else {
                return;
            };
            let width = f64::from(target.client_width());
            let mut v = view.borrow_mut();
            if width > 0.0 && (width - v.frame.layout.width).abs() >= 1.0 {
                if let Err(err) = v.repaint(width) {
                    web_sys::console::error_1(&format!("repaint failed: {err}").into());
                }
            }
        }) as Box<dyn FnMut(js_sys::Array)>);
        let observer = ResizeObserver::new(closure.as_ref().unchecked_ref()).ok()?;
        observer.observe(container);
        Some((observer, closure))
    }

    fn build_menu(
        doc: &Document,
        container: &HtmlElement,
        canvas: &HtmlCanvasElement,
        spec: &ChartSpec,
        data: DataSet,
    ) -> Result<Vec<Closure<dyn FnMut(MouseEvent)>>> {
        let mut closures = Vec::new();
        if !spec.export.enabled {
            return Ok(closures);
        }

        let button: HtmlElement = create_element(doc, "button")?;
        button.set_class_name("export_button");
        button.set_title("Chart context menu");
        button.set_text_content(Some("\u{2913}"));
        set_style(
            &button,
            &[
                ("position", "absolute"),
                ("top", "8px"),
                ("right", "8px"),
                ("background", "#fff"),
                ("border", "1px solid #7c7067"),
                ("cursor", "pointer"),
            ],
        );
        let list: HtmlElement = create_element(doc, "div")?;
        list.set_class_name("export_menu");
        set_style(
            &list,
            &[
                ("position", "absolute"),
                ("top", "36px"),
                ("right", "8px"),
                ("display", "none"),
                ("background", "#fff"),
                ("border", "1px solid #ccc"),
                ("z-index", "2"),
            ],
        );

        {
            let list = list.clone();
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                let hidden = list.style().get_property_value("display").ok().as_deref()
                    == Some("none");
                set_style(&list, &[("display", if hidden { "block" } else { "none" })]);
            }) as Box<dyn FnMut(MouseEvent)>);
            button
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .map_err(dom_err("menu button listener"))?;
            closures.push(closure);
        }

        let data = Rc::new(data);
        for item in spec.export.items.iter().copied() {
            let Some(label) = item.label() else {
                let hr: HtmlElement = create_element(doc, "hr")?;
                list.append_child(&hr).map_err(dom_err("append separator"))?;
                continue;
            };
            let entry: HtmlElement = create_element(doc, "div")?;
            entry.set_class_name("export_menu_item");
            entry.set_text_content(Some(label));
            set_style(&entry, &[("padding", "4px 12px"), ("cursor", "pointer")]);

            let container = container.clone();
            let canvas = canvas.clone();
            let data = Rc::clone(&data);
            let list_handle = list.clone();
            let title = spec.title.text.clone();
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                set_style(&list_handle, &[("display", "none")]);
                let result = match item {
                    MenuItem::ViewFullscreen => container
                        .request_fullscreen()
                        .map_err(dom_err("fullscreen")),
                    MenuItem::DownloadPng => canvas
                        .to_data_url()
                        .map_err(dom_err("canvas export"))
                        .and_then(|url| download(&url, &export_filename(&title, "png"))),
                    MenuItem::DownloadPdf => web_sys::window()
                        .ok_or_else(|| TileMapError::Dom("no window".into()))
                        .and_then(|w| w.print().map_err(dom_err("print"))),
                    MenuItem::DownloadCsv => {
                        download_csv(&data, &export_filename(&title, "csv"))
                    }
                    MenuItem::Separator => Ok(()),
                };
                if let Err(err) = result {
                    web_sys::console::error_1(&format!("export failed: {err}").into());
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            entry
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .map_err(dom_err("menu item listener"))?;
            closures.push(closure);
            list.append_child(&entry).map_err(dom_err("append menu item"))?;
        }

        container
            .append_child(&button)
            .map_err(dom_err("append menu button"))?;
        container
            .append_child(&list)
            .map_err(dom_err("append menu"))?;
        Ok(closures)
    }
}

impl Drop for MountedChart {
    fn drop(&mut self) {
        if let Some((observer, _)) = self.resize.take() {
            observer.disconnect();
        }
        self.container.remove();
    }
}

/// Builds the chart into the page once the orchestrator allows it.
struct DomMount {
    options: ChartOptions,
    /// The element observed for visibility; the chart container goes inside.
    anchor: HtmlElement,
    alive: Rc<Cell<bool>>,
    chart: Rc<RefCell<Option<MountedChart>>>,
    /// Back-reference for reporting the delayed build's outcome.
    state: Weak<RefCell<WidgetState>>,
}

impl DomMount {
    fn teardown(&self) {
        self.alive.set(false);
        self.chart.borrow_mut().take();
    }
}

impl ChartMount for DomMount {
    fn construct(&mut self, data: &DataSet) -> Result<Construction> {
        let doc = document()?;
        let container: HtmlElement = create_element(&doc, "div")?;
        container.set_id(&self.options.container_id());
        container.set_class_name("chart");
        let spec = build_chart_spec(data, &self.options);
        let fade = format!("opacity {}ms ease-in", spec.animation_ms / 3);
        set_style(&container, &[("opacity", "0"), ("transition", fade.as_str())]);
        self.anchor
            .append_child(&container)
            .map_err(dom_err("append chart container"))?;

        let alive = Rc::clone(&self.alive);
        let slot = Rc::clone(&self.chart);
        let state = Weak::clone(&self.state);
        let data = data.clone();
        spawn_local(async move {
            TimeoutFuture::new(RENDER_DELAY_MS).await;
            if !alive.get() {
                return;
            }
            let outcome = match MountedChart::build(container.clone(), spec, data) {
                Ok(chart) => {
                    set_style(&container, &[("opacity", "1")]);
                    *slot.borrow_mut() = Some(chart);
                    Ok(())
                }
                Err(err) => {
                    web_sys::console::error_1(&format!("chart construction failed: {err}").into());
                    Err(err)
                }
            };
            if let Some(state) = state.upgrade() {
                state.borrow_mut().orchestrator.finish_construction(outcome);
            }
        });
        Ok(Construction::Scheduled)
    }
}

struct WidgetState {
    orchestrator: Orchestrator<DomMount>,
}

/// A tile map mounted into a host element.
#[wasm_bindgen]
pub struct TileMapWidget {
    root: HtmlElement,
    wrapper: HtmlElement,
    state: Rc<RefCell<WidgetState>>,
    gate: VisibilityGate<IntersectionVisibility>,
}

#[wasm_bindgen]
impl TileMapWidget {
    /// Mount into `root`, fetching the default dataset for this page.
    #[wasm_bindgen(constructor)]
    pub fn new(root: HtmlElement, options: JsValue) -> std::result::Result<TileMapWidget, JsValue> {
        Self::with_source(root, options, JsValue::UNDEFINED)
    }

    /// Mount into `root`, fetching from a custom `DataSource` object.
    pub fn with_source(
        root: HtmlElement,
        options: JsValue,
        source: JsValue,
    ) -> std::result::Result<TileMapWidget, JsValue> {
        let source: DataSource = if source.is_undefined() || source.is_null() {
            DataSource::default()
        } else {
            serde_wasm_bindgen::from_value(source)
                .map_err(|e| TileMapError::Options(e.to_string()))?
        };
        let href = web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default();
        let url = source.url_for(&href);

        let widget = Self::mount(root, options)?;
        let weak = Rc::downgrade(&widget.state);
        spawn_local(async move {
            let result = match fetch_csv(&url).await {
                Ok(text) => load_dataset(&text),
                Err(err) => Err(err),
            };
            Self::deliver(&weak, result);
        });
        Ok(widget)
    }

    /// Mount into `root` with CSV text the host already has.
    pub fn from_csv(
        root: HtmlElement,
        options: JsValue,
        csv: &str,
    ) -> std::result::Result<TileMapWidget, JsValue> {
        let widget = Self::mount(root, options)?;
        Self::deliver(&Rc::downgrade(&widget.state), load_dataset(csv));
        Ok(widget)
    }

    /// True once the chart has been built and painted.
    pub fn is_constructed(&self) -> bool {
        self.state.borrow().orchestrator.is_constructed()
    }

    /// True once the container has been seen.
    pub fn is_visible(&self) -> bool {
        self.gate.is_visible()
    }

    /// Tear the widget down; pending fetches and timers become no-ops.
    pub fn unmount(&mut self) {
        self.gate.disconnect();
        let mut state = self.state.borrow_mut();
        state.orchestrator.mount().teardown();
        state.orchestrator.unmount();
        self.wrapper.remove();
    }
}

impl TileMapWidget {
    fn mount(root: HtmlElement, options: JsValue) -> Result<TileMapWidget> {
        console_error_panic_hook::set_once();
        let options: ChartOptions = serde_wasm_bindgen::from_value(options)
            .map_err(|e| TileMapError::Options(e.to_string()))?;
        options.validate()?;

        let doc = document()?;
        let wrapper: HtmlElement = create_element(&doc, "div")?;
        wrapper.set_class_name("chart_container");
        let anchor: HtmlElement = create_element(&doc, "div")?;
        // Give the observed element a footprint before the chart exists.
        set_style(&anchor, &[("min-height", "1px")]);
        wrapper
            .append_child(&anchor)
            .map_err(dom_err("append anchor"))?;
        root.append_child(&wrapper)
            .map_err(dom_err("append wrapper"))?;

        let mount_anchor = anchor.clone();
        let state = Rc::new_cyclic(|weak: &Weak<RefCell<WidgetState>>| {
            RefCell::new(WidgetState {
                orchestrator: Orchestrator::new(DomMount {
                    options,
                    anchor: mount_anchor,
                    alive: Rc::new(Cell::new(true)),
                    chart: Rc::new(RefCell::new(None)),
                    state: Weak::clone(weak),
                }),
            })
        });

        let mut gate = VisibilityGate::new(IntersectionVisibility::new(anchor.into()));
        let weak = Rc::downgrade(&state);
        gate.watch(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().orchestrator.mark_visible();
            }
        });

        Ok(TileMapWidget {
            root,
            wrapper,
            state,
            gate,
        })
    }

    fn deliver(state: &Weak<RefCell<WidgetState>>, result: Result<DataSet>) {
        // Widget dropped while the fetch was in flight.
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut state = state.borrow_mut();
        match result {
            Ok(data) => {
                if !data.defects.is_empty() {
                    web_sys::console::warn_1(
                        &format!("{} malformed field(s) in chart data", data.defects.len()).into(),
                    );
                    for defect in &data.defects {
                        web_sys::console::warn_1(&defect.to_string().into());
                    }
                }
                state.orchestrator.deliver_data(data);
            }
            Err(err) => {
                web_sys::console::error_1(&err.to_string().into());
                state.orchestrator.fail(&err);
            }
        }
    }

    /// Host element the widget was mounted into.
    pub fn root(&self) -> &HtmlElement {
        &self.root
    }
}

impl Drop for TileMapWidget {
    fn drop(&mut self) {
        self.gate.disconnect();
        if let Ok(state) = self.state.try_borrow() {
            state.orchestrator.mount().teardown();
        }
    }
}
