//! Triangle meshes of rectangles.
//!
//! A [`Mesh`] is flat node, triangle and boundary-flag arrays. [`build_mesh`]
//! produces the uniform lattice used by the FEM facade.

use crate::error::{Error, Result};
use crate::types::{Domain, Point2};

/// Linear triangle connectivity - three node indices, counter-clockwise.
pub type Triangle = [usize; 3];

/// Linear triangle mesh with per-node Dirichlet flags.
#[derive(Debug, Clone)]
pub struct Mesh {
    nodes: Vec<Point2>,
    elements: Vec<Triangle>,
    /// Dirichlet flag per node.
    boundary: Vec<bool>,
    /// Lattice cell counts `(nx, ny)` for structured meshes.
    grid: Option<(usize, usize)>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            elements: Vec::new(),
            boundary: Vec::new(),
            grid: None,
        }
    }

    /// Empty mesh with room for the given counts.
    pub fn with_capacity(n_nodes: usize, n_elements: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(n_nodes),
            elements: Vec::with_capacity(n_elements),
            boundary: Vec::with_capacity(n_nodes),
            grid: None,
        }
    }

    /// Append a node; returns its index.
    pub fn add_node(&mut self, point: Point2, on_boundary: bool) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(point);
        self.boundary.push(on_boundary);
        idx
    }

    /// Append a triangle; returns its index.
    ///
    /// # Errors
    ///
    /// [`Error::Mesh`] if a node index is out of range or repeated.
    pub fn add_element(&mut self, nodes: Triangle) -> Result<usize> {
        if let Some(&bad) = nodes.iter().find(|&&n| n >= self.nodes.len()) {
            return Err(Error::Mesh(format!(
                "triangle {:?} refers to node {}, mesh has {}",
                nodes,
                bad,
                self.nodes.len()
            )));
        }
        if nodes[0] == nodes[1] || nodes[1] == nodes[2] || nodes[0] == nodes[2] {
            return Err(Error::Mesh(format!("triangle {:?} repeats a node", nodes)));
        }

        self.elements.push(nodes);
        Ok(self.elements.len() - 1)
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Coordinates, indexed by node.
    pub fn nodes(&self) -> &[Point2] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> Option<&Point2> {
        self.nodes.get(idx)
    }

    pub fn elements(&self) -> &[Triangle] {
        &self.elements
    }

    /// Vertex coordinates of a triangle.
    pub fn element_coords(&self, elem_idx: usize) -> Option<[Point2; 3]> {
        let tri = self.elements.get(elem_idx)?;
        Some(tri.map(|n| self.nodes[n]))
    }

    /// Whether a node carries a Dirichlet condition.
    pub fn is_boundary(&self, idx: usize) -> bool {
        self.boundary.get(idx).copied().unwrap_or(false)
    }

    /// Indices of all boundary nodes, ascending.
    pub fn boundary_nodes(&self) -> Vec<usize> {
        self.boundary
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect()
    }

    /// Lattice cell counts `(nx, ny)` when built by [`build_mesh`].
    pub fn grid_dims(&self) -> Option<(usize, usize)> {
        self.grid
    }

    /// x coordinate of every node, in node order.
    pub fn x_coords(&self) -> Vec<f64> {
        self.nodes.iter().map(|p| p.x).collect()
    }

    /// y coordinate of every node, in node order.
    pub fn y_coords(&self) -> Vec<f64> {
        self.nodes.iter().map(|p| p.y).collect()
    }

    /// Bounding box `(min, max)`, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = *self.nodes.first()?;
        Some(self.nodes.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a structured triangle mesh over a rectangle.
///
/// The lattice has `nx = round(width / h)` by `ny = round(height / h)` cells,
/// stretched slightly when `h` does not divide the extents so that the outer
/// nodes sit exactly on the domain edges. Nodes are numbered row-major
/// (`j * (nx + 1) + i`) and every cell is split along its
/// lower-left/upper-right diagonal into two counter-clockwise triangles.
///
/// # Errors
///
/// [`Error::InvalidDomain`] if the domain is degenerate, or `h` is not a
/// positive finite number no larger than the smaller domain extent.
pub fn build_mesh(domain: &Domain, h: f64) -> Result<Mesh> {
    domain.validate()?;

    if !h.is_finite() || h <= 0.0 {
        return Err(Error::InvalidDomain(format!(
            "mesh spacing must be positive and finite, got {}",
            h
        )));
    }
    let min_extent = domain.width().min(domain.height());
    if h > min_extent {
        return Err(Error::InvalidDomain(format!(
            "mesh spacing {} exceeds the smaller domain extent {}",
            h, min_extent
        )));
    }

    let nx = ((domain.width() / h).round() as usize).max(1);
    let ny = ((domain.height() / h).round() as usize).max(1);
    let dx = domain.width() / nx as f64;
    let dy = domain.height() / ny as f64;

    let mut mesh = Mesh::with_capacity((nx + 1) * (ny + 1), 2 * nx * ny);
    mesh.grid = Some((nx, ny));

    for j in 0..=ny {
        let y = if j == ny { domain.y2 } else { domain.y1 + j as f64 * dy };
        for i in 0..=nx {
            let x = if i == nx { domain.x2 } else { domain.x1 + i as f64 * dx };
            let on_boundary = i == 0 || i == nx || j == 0 || j == ny;
            mesh.add_node(Point2::new(x, y), on_boundary);
        }
    }

    for j in 0..ny {
        for i in 0..nx {
            let n00 = j * (nx + 1) + i;
            let n10 = n00 + 1;
            let n01 = n00 + (nx + 1);
            let n11 = n01 + 1;

            mesh.add_element([n00, n10, n11])?;
            mesh.add_element([n00, n11, n01])?;
        }
    }

    Ok(mesh)
}
