use crate::bounds::BoundingBox;
use crate::cell::Cell;
use crate::config::VoronoiConfig;
use crate::diagram::Voronoi;
use crate::error::VoronoiError;
use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_BOUNDS: &'static str = r#"
export const BOX_ID_LEFT = -1;
export const BOX_ID_RIGHT = -2;
export const BOX_ID_BOTTOM = -3;
export const BOX_ID_TOP = -4;
export const NO_SITE = -2147483648;
"#;

const NO_SITE: i32 = i32::MIN;

impl From<VoronoiError> for JsValue {
    fn from(e: VoronoiError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

// --- Bounding Box ---

#[wasm_bindgen(js_name = BoundingBox)]
#[derive(Clone, Copy, Debug)]
pub struct BoundingBoxWASM {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

#[wasm_bindgen(js_class = BoundingBox)]
impl BoundingBoxWASM {
    #[wasm_bindgen(constructor)]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBoxWASM {
        BoundingBoxWASM { min_x, min_y, max_x, max_y }
    }
}

impl From<BoundingBoxWASM> for BoundingBox {
    fn from(b: BoundingBoxWASM) -> Self {
        BoundingBox::from_extents(b.min_x, b.min_y, b.max_x, b.max_y)
    }
}

// --- Cell Wrapper ---

#[wasm_bindgen(js_name = Cell)]
pub struct CellWASM {
    inner: Cell,
}

#[wasm_bindgen(js_class = Cell)]
impl CellWASM {
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> usize { self.inner.id() }
    #[wasm_bindgen(getter)]
    pub fn vertices(&self) -> Vec<f64> { self.inner.vertices().to_vec() }
    #[wasm_bindgen(getter)]
    pub fn edge_neighbors(&self) -> Vec<i32> { self.inner.edge_neighbors().to_vec() }
    pub fn area(&self) -> f64 { self.inner.area() }
    pub fn centroid(&self) -> Vec<f64> { self.inner.centroid().to_vec() }
}

// --- Voronoi ---

/// A Voronoi diagram over a rectangle, driven from JavaScript.
///
/// Edges are returned as flat buffers: `edges` holds `[x1, y1, x2, y2, ...]` and
/// `edge_sites` holds `[left, right, ...]`, where a border edge reports its box side ID
/// as the right site. Border edges of a diagram without sites have no left site,
/// reported as `NO_SITE`.
#[wasm_bindgen(js_name = Voronoi)]
pub struct VoronoiWASM {
    inner: Voronoi,
}

#[wasm_bindgen(js_class = Voronoi)]
impl VoronoiWASM {
    #[wasm_bindgen(constructor)]
    pub fn new(bounds: BoundingBoxWASM, close_cells: Option<bool>) -> Result<VoronoiWASM, JsValue> {
        let b: BoundingBox = bounds.into();
        b.validate()?;
        let config = VoronoiConfig::new().with_close_cells(close_cells.unwrap_or(true));
        Ok(VoronoiWASM { inner: Voronoi::with_config(b, config) })
    }

    pub fn set_sites(&mut self, sites: &[f64]) -> Result<(), JsValue> {
        Ok(self.inner.set_sites(sites)?)
    }

    pub fn set_site(&mut self, index: usize, x: f64, y: f64) { self.inner.set_site(index, x, y); }
    pub fn random_sites(&mut self, count: usize) { self.inner.random_sites(count); }
    pub fn calculate(&mut self) -> Result<(), JsValue> { Ok(self.inner.calculate()?) }
    pub fn relax(&mut self) -> Result<(), JsValue> { Ok(self.inner.relax()?) }

    #[wasm_bindgen(getter)]
    pub fn count_sites(&self) -> usize { self.inner.count_sites() }
    #[wasm_bindgen(getter)]
    pub fn count_edges(&self) -> usize { self.inner.count_edges() }
    #[wasm_bindgen(getter)]
    pub fn sites(&self) -> Vec<f64> { self.inner.sites().to_vec() }

    pub fn get_site(&self, index: usize) -> Option<Vec<f64>> {
        self.inner.get_site(index).map(|p| p.to_vec())
    }

    pub fn get_edge(&self, index: usize) -> Option<Vec<f64>> {
        self.inner.get_edge(index).map(|e| e.to_array().to_vec())
    }

    #[wasm_bindgen(getter)]
    pub fn edges(&self) -> Float64Array {
        let flat: Vec<f64> = match self.inner.diagram() {
            Some(d) => d.edges().iter().flat_map(|e| e.to_array()).collect(),
            None => Vec::new(),
        };
        Float64Array::from(flat.as_slice())
    }

    #[wasm_bindgen(getter)]
    pub fn edge_sites(&self) -> Vec<i32> {
        let Some(d) = self.inner.diagram() else {
            return Vec::new();
        };
        d.edges()
            .iter()
            .flat_map(|e| {
                let left = e.left_site.map_or(NO_SITE, |s| s as i32);
                let right = e.right_site.map(|s| s as i32).or(e.side).unwrap_or(NO_SITE);
                [left, right]
            })
            .collect()
    }

    pub fn get_cell(&self, index: usize) -> Option<CellWASM> {
        let d = self.inner.diagram()?;
        (index < d.sites().len()).then(|| CellWASM { inner: d.cell(index) })
    }

    #[wasm_bindgen(getter)]
    pub fn cells(&self) -> Vec<CellWASM> {
        self.inner
            .diagram()
            .map(|d| d.cells().into_iter().map(|inner| CellWASM { inner }).collect())
            .unwrap_or_default()
    }
}
