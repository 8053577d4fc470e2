use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular grid of cell display states, replaced wholesale on every reply.
///
/// On the wire this is a list of rows, each a list of cells. Internally it is
/// indexed by `(x, y)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<CellView>>", into = "Vec<Vec<CellView>>")]
pub struct Board {
    cells: Array2<CellView>,
}

impl Board {
    pub fn from_rows(rows: Vec<Vec<CellView>>) -> Result<Self> {
        let expected = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(ProtocolError::RaggedBoard {
                row,
                expected,
                found,
            });
        }

        let (cols, row_count) = (expected, rows.len());
        if cols > Coord::MAX.into() || row_count > Coord::MAX.into() {
            return Err(ProtocolError::BoardTooLarge {
                cols,
                rows: row_count,
            });
        }

        let cells = Array2::from_shape_fn((cols, row_count), |(x, y)| rows[y][x].clone());
        Ok(Self { cells })
    }

    pub fn covered((cols, rows): Coord2) -> Self {
        Self {
            cells: Array2::default((cols, rows).to_nd_index()),
        }
    }

    /// `(columns, rows)`
    pub fn size(&self) -> Coord2 {
        let (cols, rows) = self.cells.dim();
        // from_rows caps both axes at Coord::MAX
        (cols as Coord, rows as Coord)
    }

    pub fn contains(&self, (x, y): Coord2) -> bool {
        let (cols, rows) = self.size();
        x < cols && y < rows
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<&CellView> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = &CellView>> {
        self.cells.columns().into_iter().map(|row| row.into_iter())
    }

    pub fn flagged_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_flagged()).count()
    }
}

impl TryFrom<Vec<Vec<CellView>>> for Board {
    type Error = ProtocolError;

    fn try_from(rows: Vec<Vec<CellView>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<Board> for Vec<Vec<CellView>> {
    fn from(board: Board) -> Self {
        board
            .rows()
            .map(|row| row.cloned().collect())
            .collect()
    }
}
