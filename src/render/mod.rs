//! 3D surface rendering with plotters (SVG backend).
//!
//! x is the underlying price, the vertical axis is the sampled value and the
//! depth axis is time. Each grid cell becomes one filled quad coloured by its
//! mean value on the Viridis map; a colour legend is drawn to the right.

use anyhow::{anyhow, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};
use tracing::{debug, info};

use crate::config::RenderConfig;
use crate::grid::Surface;

const LEGEND_WIDTH: i32 = 160;
const LEGEND_STEPS: usize = 64;

fn plot_err<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("plotting failed: {}", e)
}

fn viridis(value: f64, lo: f64, hi: f64) -> RGBColor {
    ColorMap::<RGBColor, f64>::get_color_normalized(&ViridisRGB, value, lo, hi)
}

/// Widen `[lo, hi]` by 5% (or by a unit-scaled step when it is degenerate).
fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    let pad = if hi > lo {
        (hi - lo) * 0.05
    } else {
        lo.abs().max(1.0) * 0.05
    };
    (lo - pad, hi + pad)
}

fn axis_range(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi > lo {
        (lo, hi)
    } else {
        padded_range(lo, hi)
    }
}

/// Render `surface` to an SVG document held in memory.
pub fn render_svg(surface: &Surface, config: &RenderConfig) -> Result<String> {
    config.validate()?;
    let (value_lo, value_hi) = surface
        .finite_range()
        .ok_or_else(|| anyhow!("Surface has no finite values to render"))?;

    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, (config.width, config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let split = (config.width as i32 - LEGEND_WIDTH).max(1);
        let (plot_area, legend_area) = root.split_horizontally(split);

        let color_range = padded_range(value_lo, value_hi);
        draw_surface(&plot_area, surface, config, color_range)?;
        draw_legend(&legend_area, config, color_range)?;

        root.present().map_err(plot_err)?;
    }

    debug!(
        kind = %surface.kind,
        bytes = buffer.len(),
        "rendered surface to svg"
    );
    Ok(buffer)
}

/// Render `surface` and write it to `config.output_path`.
pub fn render_to_file(surface: &Surface, config: &RenderConfig) -> Result<()> {
    let svg = render_svg(surface, config)?;
    let path = &config.output_path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), kind = %surface.kind, "surface written");
    Ok(())
}

fn draw_surface(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    surface: &Surface,
    config: &RenderConfig,
    (lo, hi): (f64, f64),
) -> Result<()> {
    let (s_min, s_max) = axis_range(&surface.underlying);
    let (t_min, t_max) = axis_range(&surface.time);

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .caption(config.title.as_str(), ("sans-serif", 24))
        .build_cartesian_3d(s_min..s_max, lo..hi, t_min..t_max)
        .map_err(plot_err)?;

    let pitch = config.elevation_deg.to_radians();
    let yaw = config.azimuth_deg.to_radians();
    chart.with_projection(|mut pb| {
        pb.pitch = pitch;
        pb.yaw = yaw;
        pb.scale = 0.8;
        pb.into_matrix()
    });

    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.15))
        .max_light_lines(3)
        .draw()
        .map_err(plot_err)?;

    let (rows, cols) = surface.shape();
    let alpha = config.alpha;
    let cell = |i: usize, j: usize| -> (f64, f64, f64) {
        (surface.underlying[j], surface.values[i][j], surface.time[i])
    };

    if rows < 2 || cols < 2 {
        // Not enough points for a quad; show the samples themselves
        chart
            .draw_series(
                (0..rows)
                    .flat_map(|i| (0..cols).map(move |j| (i, j)))
                    .filter(|&(i, j)| surface.values[i][j].is_finite())
                    .map(|(i, j)| {
                        let color = viridis(surface.values[i][j], lo, hi);
                        Circle::new(cell(i, j), 3, color.mix(alpha).filled())
                    }),
            )
            .map_err(plot_err)?;
    } else {
        let quads = (0..rows - 1)
            .flat_map(|i| (0..cols - 1).map(move |j| (i, j)))
            .filter_map(|(i, j)| {
                let corners = [cell(i, j), cell(i, j + 1), cell(i + 1, j + 1), cell(i + 1, j)];
                if corners.iter().any(|c| !c.1.is_finite()) {
                    return None;
                }
                let mean = corners.iter().map(|c| c.1).sum::<f64>() / 4.0;
                let color = viridis(mean, lo, hi);
                Some(Polygon::new(corners.to_vec(), color.mix(alpha).filled()))
            });
        chart.draw_series(quads).map_err(plot_err)?;
    }

    // Axis captions, placed along the edges of the bounding box
    let font = ("sans-serif", 20).into_font();
    let s_mid = (s_min + s_max) / 2.0;
    let t_mid = (t_min + t_max) / 2.0;
    chart
        .draw_series([
            Text::new(config.x_label.clone(), (s_mid, lo, t_min), font.clone()),
            Text::new(config.y_label.clone(), (s_max, lo, t_mid), font.clone()),
            Text::new(config.z_label.clone(), (s_min, hi, t_min), font),
        ])
        .map_err(plot_err)?;

    Ok(())
}

fn draw_legend(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    config: &RenderConfig,
    (lo, hi): (f64, f64),
) -> Result<()> {
    let mut legend = ChartBuilder::on(area)
        .margin_top(80)
        .margin_bottom(80)
        .margin_right(20)
        .y_label_area_size(90)
        .build_cartesian_2d(0.0..1.0, lo..hi)
        .map_err(plot_err)?;

    legend
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_desc(config.legend_label.as_str())
        .draw()
        .map_err(plot_err)?;

    let step = (hi - lo) / LEGEND_STEPS as f64;
    legend
        .draw_series((0..LEGEND_STEPS).map(|k| {
            let y0 = lo + step * k as f64;
            let y1 = y0 + step;
            let color = viridis((y0 + y1) / 2.0, lo, hi);
            Rectangle::new([(0.0, y0), (1.0, y1)], color.filled())
        }))
        .map_err(plot_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SurfaceConfig;
    use crate::models::SurfaceKind;

    fn tiny_surface(values: Vec<Vec<f64>>) -> Surface {
        let rows = values.len();
        let cols = values.first().map_or(0, |r| r.len());
        Surface {
            kind: SurfaceKind::Price,
            underlying: (0..cols).map(|j| 50.0 * j as f64).collect(),
            time: (0..rows).map(|i| 0.1 + 0.2 * i as f64).collect(),
            values,
        }
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(0.0, 10.0), (-0.5, 10.5));
        let (lo, hi) = padded_range(2.0, 2.0);
        assert!(lo < 2.0 && hi > 2.0);
        let (lo, hi) = padded_range(0.0, 0.0);
        assert!(lo < 0.0 && hi > 0.0);
    }

    #[test]
    fn test_render_svg_contains_labels() {
        let config = SurfaceConfig::price().render;
        let surface = tiny_surface(vec![vec![0.0, 0.5, 1.0], vec![0.1, 0.6, 1.2]]);
        let svg = render_svg(&surface, &config).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Call option price"));
        assert!(svg.contains("t/T"));
        assert!(svg.contains("Option price"));
    }

    // The 3D chart always draws three axis panels as polygons
    const AXIS_PANELS: usize = 3;

    fn count(svg: &str, tag: &str) -> usize {
        svg.matches(tag).count()
    }

    fn polygon_fills(svg: &str) -> std::collections::HashSet<&str> {
        svg.split("<polygon")
            .skip(1)
            .filter_map(|el| {
                let el = &el[..el.find('>').unwrap_or(el.len())];
                let start = el.find("fill=\"")? + 6;
                let end = el[start..].find('"')?;
                Some(&el[start..start + end])
            })
            .collect()
    }

    #[test]
    fn test_render_draws_one_quad_per_cell_and_legend() {
        let config = SurfaceConfig::price();
        let surface = crate::compute_surface(&config).unwrap();
        let svg = render_svg(&surface, &config.render).unwrap();

        assert_eq!(count(&svg, "<polygon"), 19 * 19 + AXIS_PANELS);
        // Legend strips plus the background
        assert_eq!(count(&svg, "<rect"), LEGEND_STEPS + 1);
        // Quads are shaded along the colour map, not in a single colour
        assert!(polygon_fills(&svg).len() > 100);
    }

    #[test]
    fn test_render_skips_cells_with_non_finite_corner() {
        let config = SurfaceConfig::delta().render;
        let mut values = vec![vec![0.0, 0.5, 1.0], vec![0.1, 0.6, 1.2], vec![0.2, 0.7, 1.4]];
        let full = render_svg(&tiny_surface(values.clone()), &config).unwrap();
        assert_eq!(count(&full, "<polygon"), 4 + AXIS_PANELS);

        // The corner cell touches a single quad
        values[0][0] = f64::NAN;
        let svg = render_svg(&tiny_surface(values), &config).unwrap();
        assert_eq!(count(&svg, "<polygon"), 3 + AXIS_PANELS);
    }

    #[test]
    fn test_render_single_row_and_flat_values() {
        let config = SurfaceConfig::price().render;
        assert!(render_svg(&tiny_surface(vec![vec![1.0, 2.0, 3.0]]), &config).is_ok());
        assert!(render_svg(&tiny_surface(vec![vec![0.0, 0.0], vec![0.0, 0.0]]), &config).is_ok());
    }

    #[test]
    fn test_render_rejects_all_non_finite() {
        let config = SurfaceConfig::price().render;
        let surface = tiny_surface(vec![vec![f64::NAN, f64::NAN], vec![f64::INFINITY, f64::NAN]]);
        assert!(render_svg(&surface, &config).is_err());
    }
}
