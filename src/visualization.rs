//! Visualization utilities for TSP solutions.
//!
//! Generates SVG drawings of tours and exports plain data for plotting.

use crate::error::{Result, TspError};
use crate::instance::TspInstance;
use crate::solution::Solution;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG visualization generator
pub struct Visualizer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// Point radius
    pub node_radius: f64,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 800.0,
            height: 800.0,
            margin: 50.0,
            node_radius: 5.0,
        }
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate SVG visualization of a solution.
    ///
    /// Needs coordinates; a matrix-only instance has nothing to draw.
    pub fn generate_svg(&self, instance: &TspInstance, solution: &Solution) -> Result<String> {
        if !instance.has_points() {
            return Err(TspError::MissingCoordinates);
        }
        instance.validate_tour(&solution.tour)?;

        let mut svg = String::new();

        let (min_x, max_x, min_y, max_y) = self.get_bounds(instance);

        let scale_x = (self.width - 2.0 * self.margin) / (max_x - min_x).max(1e-9);
        let scale_y = (self.height - 2.0 * self.margin) / (max_y - min_y).max(1e-9);
        let scale = scale_x.min(scale_y);

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .node {{ fill: #e74c3c; stroke: #c0392b; stroke-width: 1; }}
    .start {{ fill: #2ecc71; stroke: #27ae60; stroke-width: 2; }}
    .edge {{ stroke: #3466b0; stroke-width: 2; stroke-opacity: 0.7; fill: none; }}
    .label {{ font-family: Arial; font-size: 12px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ffffff"/>
"##,
            self.width, self.height, self.width, self.height
        ));

        svg.push_str(&format!(
            r##"<text x="{}" y="25" class="title">{} | {} | Length: {:.2}</text>
"##,
            self.margin, instance.name, solution.algorithm, solution.cost
        ));

        let transform = |x: f64, y: f64| -> (f64, f64) {
            let tx = self.margin + (x - min_x) * scale;
            let ty = self.height - self.margin - (y - min_y) * scale;
            (tx, ty)
        };

        if solution.tour.len() > 1 {
            let mut path = String::new();
            for (k, &node) in solution.tour.iter().enumerate() {
                let p = instance.points[node];
                let (x, y) = transform(p.x, p.y);
                if k == 0 {
                    path.push_str(&format!("M {:.2} {:.2}", x, y));
                } else {
                    path.push_str(&format!(" L {:.2} {:.2}", x, y));
                }
            }
            path.push_str(" Z");

            svg.push_str(&format!(r##"<path d="{}" class="edge"/>
"##, path));
        }

        let first = solution.tour.first().copied();
        for (id, point) in instance.points.iter().enumerate() {
            let (x, y) = transform(point.x, point.y);
            let class = if Some(id) == first { "start" } else { "node" };

            svg.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="{}"/>
"##,
                x, y, self.node_radius, class
            ));

            svg.push_str(&format!(
                r##"<text x="{:.2}" y="{:.2}" class="label" text-anchor="end">{}</text>
"##,
                x - self.node_radius, y - self.node_radius - 2.0, id
            ));
        }

        svg.push_str("</svg>");

        Ok(svg)
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())?;
        Ok(())
    }

    /// Draw a solution and write it to `path`
    pub fn render_to_file<P: AsRef<Path>>(
        &self,
        instance: &TspInstance,
        solution: &Solution,
        path: P,
    ) -> Result<()> {
        let svg = self.generate_svg(instance, solution)?;
        self.save_svg(&svg, path.as_ref()).map_err(|source| TspError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// Get coordinate bounds
    fn get_bounds(&self, instance: &TspInstance) -> (f64, f64, f64, f64) {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for point in &instance.points {
            min_x = min_x.min(point.x);
            max_x = max_x.max(point.x);
            min_y = min_y.min(point.y);
            max_y = max_y.max(point.y);
        }

        (min_x, max_x, min_y, max_y)
    }

    /// Export the closed tour as `index,x,y` rows for external plotting.
    /// The first point is repeated at the end.
    pub fn export_plot_data(&self, instance: &TspInstance, solution: &Solution) -> Result<String> {
        if !instance.has_points() {
            return Err(TspError::MissingCoordinates);
        }
        instance.validate_tour(&solution.tour)?;

        let mut data = String::new();

        data.push_str(&format!("# Instance: {}\n", instance.name));
        data.push_str(&format!("# Length: {:.4}\n", solution.cost));
        data.push_str("index,x,y\n");

        for &node in solution.tour.iter().chain(solution.tour.first()) {
            let p = instance.points[node];
            data.push_str(&format!("{},{},{}\n", node, p.x, p.y));
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Point;

    fn square() -> TspInstance {
        TspInstance::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ])
        .unwrap()
        .with_name("square")
    }

    #[test]
    fn test_visualizer() {
        let instance = square();
        let solution = Solution::from_tour(&instance, vec![0, 1, 2, 3], "test").unwrap();

        let viz = Visualizer::new();
        let svg = viz.generate_svg(&instance, &solution).unwrap();

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("square"));
        assert!(svg.contains(" Z\""));
        assert_eq!(svg.matches("<circle").count(), 4);
    }

    #[test]
    fn test_matrix_only_instance_cannot_be_drawn() {
        let instance = TspInstance::from_matrix(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let solution = Solution::from_tour(&instance, vec![0, 1], "test").unwrap();
        let viz = Visualizer::new();
        assert!(matches!(viz.generate_svg(&instance, &solution), Err(TspError::MissingCoordinates)));
    }

    #[test]
    fn test_render_to_file() {
        let instance = square();
        let solution = Solution::from_tour(&instance, vec![0, 1, 2, 3], "test").unwrap();
        let viz = Visualizer::new();

        let path = std::env::temp_dir().join(format!("tsp-anneal-viz-{}.svg", std::process::id()));
        viz.render_to_file(&instance, &solution, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(content.ends_with("</svg>"));

        let missing_dir = std::env::temp_dir()
            .join(format!("tsp-anneal-no-such-dir-{}", std::process::id()))
            .join("tour.svg");
        assert!(matches!(
            viz.render_to_file(&instance, &solution, &missing_dir),
            Err(TspError::Io { .. })
        ));

        let matrix_only = TspInstance::from_matrix(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let pair = Solution::from_tour(&matrix_only, vec![0, 1], "test").unwrap();
        assert!(matches!(
            viz.render_to_file(&matrix_only, &pair, &path),
            Err(TspError::MissingCoordinates)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_export_plot_data_closes_loop() {
        let instance = square();
        let solution = Solution::from_tour(&instance, vec![2, 3, 0, 1], "test").unwrap();
        let data = Visualizer::new().export_plot_data(&instance, &solution).unwrap();
        let rows: Vec<&str> = data.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(rows[0], "index,x,y");
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[1], rows[5]);
    }
}
