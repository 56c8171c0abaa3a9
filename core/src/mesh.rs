use palette::Srgb;
use tracing::debug;

use crate::colormap::ColorRamp;
use crate::error::{TerrainError, TerrainResult};
use crate::grid::{HeightGrid, Point3};

// Vertex indices of one triangle, counter-clockwise seen from outside
pub type Face = [u32; 3];

// One triangle with its own copy of every corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3; 3],
}

impl Triangle {
    // Unit normal from the winding order, zero for degenerate triangles
    pub fn normal(&self) -> [f32; 3] {
        let [a, b, c] = self.vertices;
        let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let n = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len > f32::EPSILON {
            [n[0] / len, n[1] / len, n[2] / len]
        } else {
            [0.0, 0.0, 0.0]
        }
    }
}

// Unindexed mesh, every triangle stands alone
#[derive(Debug, Clone, Default)]
pub struct TriangleSoup {
    pub triangles: Vec<Triangle>,
}

impl TriangleSoup {
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

// Shared vertex list plus faces indexing into it
#[derive(Debug, Clone, Default)]
pub struct IndexedMesh {
    pub vertices: Vec<Point3>,
    pub faces: Vec<Face>,
    pub colors: Option<Vec<Srgb<u8>>>,
}

impl IndexedMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    // Per-vertex colour from each vertex height normalised over [min, max]
    pub fn with_colors(mut self, ramp: &ColorRamp, min: f32, max: f32) -> Self {
        let colors = self
            .vertices
            .iter()
            .map(|v| ramp.for_height(v[2], min, max))
            .collect();
        self.colors = Some(colors);
        self
    }

    pub fn triangle(&self, face: Face) -> Triangle {
        Triangle {
            vertices: face.map(|i| self.vertices[i as usize]),
        }
    }
}

// Turns a height grid into triangles.
//
// Top surface vertices are numbered row-major, `row * width + col`. A closed
// solid adds a base plane copy of every vertex at `width * height + index`.
#[derive(Debug, Clone, Copy)]
pub struct MeshBuilder<'a> {
    grid: &'a HeightGrid,
    extrude: bool,
    base_depth: f32,
}

impl<'a> MeshBuilder<'a> {
    pub fn new(grid: &'a HeightGrid) -> TerrainResult<Self> {
        if grid.width() < 2 || grid.height() < 2 {
            return Err(TerrainError::InsufficientResolution {
                width: grid.width(),
                height: grid.height(),
            });
        }
        Ok(Self {
            grid,
            extrude: false,
            base_depth: (-2.0 * grid.z_height()) as f32,
        })
    }

    pub fn extrude(mut self, extrude: bool) -> Self {
        self.extrude = extrude;
        self
    }

    pub fn base_depth(mut self, depth: f32) -> Self {
        self.base_depth = depth;
        self
    }

    pub fn is_extruded(&self) -> bool {
        self.extrude
    }

    pub fn grid(&self) -> &'a HeightGrid {
        self.grid
    }

    pub fn vertex_count(&self) -> usize {
        let surface = self.grid.len();
        if self.extrude { 2 * surface } else { surface }
    }

    pub fn surface_face_count(&self) -> usize {
        let (w, h) = (self.grid.width(), self.grid.height());
        2 * (w - 1) * (h - 1)
    }

    // Known up front, before any geometry is produced
    pub fn face_count(&self) -> usize {
        let (w, h) = (self.grid.width(), self.grid.height());
        let top = self.surface_face_count();
        if !self.extrude {
            return top;
        }
        let walls = 2 * 2 * (w - 1) + 2 * 2 * (h - 1);
        top + walls + top
    }

    pub fn vertex(&self, index: usize) -> Point3 {
        let surface = self.grid.len();
        let (top, on_base) = if index >= surface {
            (index - surface, true)
        } else {
            (index, false)
        };
        let row = top / self.grid.width();
        let col = top % self.grid.width();
        let mut p = self.grid.position(row, col);
        if on_base {
            p[2] = self.base_depth;
        }
        p
    }

    pub fn faces(&self) -> impl Iterator<Item = Face> + use<> {
        let (w, h) = (self.grid.width(), self.grid.height());
        let base = self.grid.len() as u32;
        let closure = self
            .extrude
            .then(|| wall_faces(w, h, base).chain(surface_faces(w, h, base, true)));
        surface_faces(w, h, 0, false).chain(closure.into_iter().flatten())
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces().map(|face| Triangle {
            vertices: face.map(|i| self.vertex(i as usize)),
        })
    }

    pub fn build_soup(&self) -> TriangleSoup {
        let triangles: Vec<Triangle> = self.triangles().collect();
        debug!(triangles = triangles.len(), extrude = self.extrude, "built triangle soup");
        TriangleSoup { triangles }
    }

    pub fn build_indexed(&self) -> IndexedMesh {
        let vertices: Vec<Point3> = (0..self.vertex_count()).map(|i| self.vertex(i)).collect();
        let faces: Vec<Face> = self.faces().collect();
        debug!(
            vertices = vertices.len(),
            faces = faces.len(),
            extrude = self.extrude,
            "built indexed mesh"
        );
        IndexedMesh {
            vertices,
            faces,
            colors: None,
        }
    }
}

// Two triangles per lattice quad. `offset` shifts indices onto the base copy,
// `flip` reverses the winding so the base faces down.
fn surface_faces(w: usize, h: usize, offset: u32, flip: bool) -> impl Iterator<Item = Face> {
    (0..h - 1).flat_map(move |row| {
        (0..w - 1).flat_map(move |col| {
            let at = |r: usize, c: usize| offset + (r * w + c) as u32;
            let p00 = at(row, col);
            let p10 = at(row, col + 1);
            let p01 = at(row + 1, col);
            let p11 = at(row + 1, col + 1);
            if flip {
                [[p00, p01, p10], [p10, p01, p11]]
            } else {
                [[p00, p10, p01], [p10, p11, p01]]
            }
        })
    })
}

// Quads joining every boundary edge to the base plane, wound to face outward
fn wall_faces(w: usize, h: usize, base: u32) -> impl Iterator<Item = Face> {
    let top = move |row: usize, col: usize| (row * w + col) as u32;
    // `a`/`b` on the surface, `lo_a`/`lo_b` straight below them
    let quad = move |a: u32, b: u32, outward_ccw: bool| {
        let (lo_a, lo_b) = (a + base, b + base);
        if outward_ccw {
            [[a, lo_a, b], [b, lo_a, lo_b]]
        } else {
            [[a, b, lo_a], [b, lo_b, lo_a]]
        }
    };
    let south = (0..w - 1).flat_map(move |c| quad(top(0, c), top(0, c + 1), true));
    let north = (0..w - 1).flat_map(move |c| quad(top(h - 1, c), top(h - 1, c + 1), false));
    let west = (0..h - 1).flat_map(move |r| quad(top(r, 0), top(r + 1, 0), false));
    let east = (0..h - 1).flat_map(move |r| quad(top(r, w - 1), top(r + 1, w - 1), true));
    south.chain(north).chain(west).chain(east)
}
