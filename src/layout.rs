//! Tile grid geometry: where headings, tiles, legend and caption go for a
//! resolved width, and which tile sits under a pointer.

use crate::chart_spec::{ChartSpec, LegendLayout, ResolvedLayout};

/// Padding around the plot in logical pixels.
const PLOT_PADDING: f64 = 10.0;
/// Gap between a tile and its cell edge, as a fraction of the cell.
const TILE_GAP: f64 = 0.06;
const CAPTION_LINE_HEIGHT: f64 = 18.0;
const CAPTION_MARGIN: f64 = 15.0;
const LEGEND_SYMBOL: f64 = 12.0;
const LEGEND_ROW_HEIGHT: f64 = 22.0;
/// Horizontal legends reserve this band above the caption.
const HORIZONTAL_LEGEND_BAND: f64 = 90.0;

/// Axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

/// Screen placement of one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    /// Index into [`ChartSpec::tiles`].
    pub index: usize,
    pub cx: f64,
    pub cy: f64,
    /// Half the drawn tile size.
    pub radius: f64,
}

/// One positioned legend entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendPlacement {
    /// Index into the legend items.
    pub index: usize,
    pub symbol: Rect,
    pub text_x: f64,
    pub text_y: f64,
}

/// Everything the scene builder needs to place primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub header_height: f64,
    pub plot: Rect,
    pub cell_size: f64,
    pub tiles: Vec<TilePlacement>,
    pub legend_title_y: f64,
    pub legend: Vec<LegendPlacement>,
    pub caption_y: f64,
}

impl ChartLayout {
    /// Compute placement for `spec` at the resolved size.
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(spec: &ChartSpec, resolved: &ResolvedLayout) -> Self {
        let width = resolved.width.max(1.0);
        let height = resolved.height.max(1.0);

        let mut header_height = PLOT_PADDING + resolved.title_line_height_px;
        if let Some(sub) = &spec.subtitle {
            header_height += sub.line_height_px + 8.0;
        }
        header_height = header_height.max(spec.logo.y + spec.logo.height * 0.5);

        let caption_lines = spec.caption.lines().len() as f64;
        let caption_height = caption_lines * CAPTION_LINE_HEIGHT + CAPTION_MARGIN;
        let caption_y = height - caption_height + CAPTION_MARGIN;

        let legend_band = match resolved.legend_layout {
            LegendLayout::Vertical => 0.0,
            LegendLayout::Horizontal => HORIZONTAL_LEGEND_BAND,
        };
        let plot = Rect {
            x: PLOT_PADDING,
            y: header_height + PLOT_PADDING,
            w: (width - 2.0 * PLOT_PADDING).max(0.0),
            h: (height - header_height - caption_height - legend_band - 2.0 * PLOT_PADDING)
                .max(0.0),
        };

        let (tiles, cell_size) = place_tiles(spec, plot);
        let (legend_title_y, legend) =
            place_legend(spec, resolved.legend_layout, plot, caption_y, width);

        Self {
            width,
            height,
            header_height,
            plot,
            cell_size,
            tiles,
            legend_title_y,
            legend,
            caption_y,
        }
    }

    /// Tile under the pointer, as an index into [`ChartSpec::tiles`].
    pub fn hit_test(&self, px: f64, py: f64) -> Option<usize> {
        self.tiles
            .iter()
            .find(|t| {
                let dx = px - t.cx;
                let dy = py - t.cy;
                dx * dx + dy * dy <= t.radius * t.radius
            })
            .map(|t| t.index)
    }
}

#[allow(clippy::cast_precision_loss)]
fn place_tiles(spec: &ChartSpec, plot: Rect) -> (Vec<TilePlacement>, f64) {
    let Some(first) = spec.tiles.first() else {
        return (Vec::new(), 0.0);
    };
    let (min_x, min_y, max_x, max_y) = spec.tiles.iter().fold(
        (first.x, first.y, first.x, first.y),
        |(x0, y0, x1, y1), t| (x0.min(t.x), y0.min(t.y), x1.max(t.x), y1.max(t.y)),
    );
    let cols = f64::from(max_x) - f64::from(min_x) + 1.0;
    let rows = f64::from(max_y) - f64::from(min_y) + 1.0;
    let cell = (plot.w / cols).min(plot.h / rows).max(0.0);

    // Center the grid inside the plot.
    let origin_x = plot.x + (plot.w - cell * cols) / 2.0;
    let origin_y = plot.y + (plot.h - cell * rows) / 2.0;
    let radius = cell * (1.0 - TILE_GAP) / 2.0;

    let tiles = spec
        .tiles
        .iter()
        .enumerate()
        .map(|(index, t)| TilePlacement {
            index,
            cx: origin_x + (f64::from(t.x) - f64::from(min_x) + 0.5) * cell,
            cy: origin_y + (f64::from(t.y) - f64::from(min_y) + 0.5) * cell,
            radius,
        })
        .collect();
    (tiles, cell)
}

#[allow(clippy::cast_precision_loss)]
fn place_legend(
    spec: &ChartSpec,
    layout: LegendLayout,
    plot: Rect,
    caption_y: f64,
    width: f64,
) -> (f64, Vec<LegendPlacement>) {
    let title_lines = spec.legend.title.lines().count() as f64;
    let title_height = title_lines * spec.legend.font_px * 1.3;
    let items = spec.legend.items.len();

    match layout {
        LegendLayout::Vertical => {
            // Floating in the lower-left corner of the plot.
            let block = title_height + items as f64 * LEGEND_ROW_HEIGHT;
            let top = (plot.y + plot.h - block).max(plot.y);
            let placements = (0..items)
                .map(|index| {
                    let row_y = top + title_height + index as f64 * LEGEND_ROW_HEIGHT;
                    legend_entry(index, plot.x, row_y)
                })
                .collect();
            (top, placements)
        }
        LegendLayout::Horizontal => {
            let top = plot.y + plot.h + PLOT_PADDING;
            let mut x = plot.x;
            let mut row_y = top + title_height;
            let item_width = 130.0;
            let mut placements = Vec::with_capacity(items);
            for index in 0..items {
                if x + item_width > width - PLOT_PADDING && x > plot.x {
                    x = plot.x;
                    row_y += LEGEND_ROW_HEIGHT;
                }
                placements.push(legend_entry(index, x, row_y));
                x += item_width;
            }
            (top.min(caption_y), placements)
        }
    }
}

fn legend_entry(index: usize, x: f64, row_y: f64) -> LegendPlacement {
    LegendPlacement {
        index,
        symbol: Rect {
            x,
            y: row_y + (LEGEND_ROW_HEIGHT - LEGEND_SYMBOL) / 2.0,
            w: LEGEND_SYMBOL,
            h: LEGEND_SYMBOL,
        },
        text_x: x + LEGEND_SYMBOL + 6.0,
        text_y: row_y + LEGEND_ROW_HEIGHT / 2.0,
    }
}
