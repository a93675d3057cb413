//! Grid description for the exchange layer.
//!
//! Cells carry no coordinates or topology. A single cell is a rank-0
//! "scalar" grid; several independent cells form a rank-1 "vector" grid.

pub const GRID_ID: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridInfo {
    size: usize,
}

impl GridInfo {
    pub fn for_cells(n_cells: usize) -> Self {
        Self { size: n_cells }
    }

    pub fn type_name(&self) -> &'static str {
        if self.size == 1 {
            "scalar"
        } else {
            "vector"
        }
    }

    pub fn rank(&self) -> usize {
        if self.size == 1 {
            0
        } else {
            1
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// One entry per dimension; empty for the scalar grid.
    pub fn shape(&self) -> Vec<usize> {
        if self.rank() == 0 {
            Vec::new()
        } else {
            vec![self.size]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cell_is_scalar() {
        let g = GridInfo::for_cells(1);
        assert_eq!(g.type_name(), "scalar");
        assert_eq!(g.rank(), 0);
        assert_eq!(g.size(), 1);
        assert!(g.shape().is_empty());
    }

    #[test]
    fn several_cells_are_a_vector() {
        let g = GridInfo::for_cells(5);
        assert_eq!(g.type_name(), "vector");
        assert_eq!(g.rank(), 1);
        assert_eq!(g.shape(), vec![5]);
    }
}
