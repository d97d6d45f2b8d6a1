use crate::discard::stats::ScoreStats;

/// Row-major table of scores, one row per discard option.
///
/// Columns a row cannot take (a turn card already in the deal, or a crib
/// pair using a dealt card) hold `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreMatrix {
    rows: usize,
    columns: usize,
    cells: Vec<Option<u8>>,
}

impl ScoreMatrix {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![None; rows * columns],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<u8> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells[row * self.columns + column]
    }

    pub(crate) fn set(&mut self, row: usize, column: usize, score: u8) {
        self.cells[row * self.columns + column] = Some(score);
    }

    pub fn row(&self, row: usize) -> &[Option<u8>] {
        let start = row * self.columns;
        &self.cells[start..start + self.columns]
    }

    pub fn valid_cells(&self, row: usize) -> impl Iterator<Item = u8> + '_ {
        self.row(row).iter().flatten().copied()
    }

    pub fn row_stats(&self, row: usize) -> Option<ScoreStats> {
        ScoreStats::from_scores(self.valid_cells(row))
    }
}
