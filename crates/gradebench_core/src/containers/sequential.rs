//! Sequential shapes: fixed-length arrays, 2D arrays, FIFO queues and LIFO stacks.

use std::collections::VecDeque;

use crate::faults::Fault;
use crate::value::Value;

/// A fixed-length array with bounds-checked positional access.
#[derive(Debug, Clone, Default)]
pub struct Array {
    items: Vec<Value>,
}

impl Array {
    /// Create an array of `length` slots, each holding `None`.
    pub fn new(length: usize) -> Self {
        Self {
            items: vec![Value::None; length],
        }
    }

    pub fn from_values(items: Vec<Value>) -> Self {
        Self { items }
    }

    pub fn length(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, index: usize) -> Result<&Value, Fault> {
        let len = self.items.len();
        self.items.get(index).ok_or_else(|| out_of_range(index, len))
    }

    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<(), Fault> {
        let len = self.items.len();
        let slot = self.items.get_mut(index).ok_or_else(|| out_of_range(index, len))?;
        *slot = value.into();
        Ok(())
    }

    /// Swap two slots; both indices are bounds-checked.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<(), Fault> {
        let len = self.items.len();
        if i >= len {
            return Err(out_of_range(i, len));
        }
        if j >= len {
            return Err(out_of_range(j, len));
        }
        self.items.swap(i, j);
        Ok(())
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub(crate) fn values_mut(&mut self) -> &mut [Value] {
        &mut self.items
    }
}

fn out_of_range(index: usize, len: usize) -> Fault {
    Fault::index_error(format!("index ({index}) can't be < 0 or >= length ({len})"))
}

/// A rectangular 2D array addressed by `(row, column)`.
#[derive(Debug, Clone)]
pub struct Array2D {
    rows: usize,
    columns: usize,
    cells: Vec<Value>,
}

impl Array2D {
    /// Create a `rows × columns` array filled with `None`.
    ///
    /// ## Errors
    /// - `ValueError` if either dimension is zero.
    pub fn new(rows: usize, columns: usize) -> Result<Self, Fault> {
        if rows == 0 || columns == 0 {
            return Err(Fault::value_error(format!(
                "both num_rows ({rows}) and num_cols ({columns}) must be > 0"
            )));
        }
        Ok(Self {
            rows,
            columns,
            cells: vec![Value::None; rows * columns],
        })
    }

    /// Build from row vectors.
    ///
    /// ## Errors
    /// - `ValueError` if there are no rows, a row is empty, or the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<Value>>) -> Result<Self, Fault> {
        let columns = rows.first().map_or(0, Vec::len);
        let mut grid = Self::new(rows.len(), columns)?;
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != columns {
                return Err(Fault::value_error(format!(
                    "row {r} has {} columns, expected {columns}",
                    row.len()
                )));
            }
            for (c, value) in row.into_iter().enumerate() {
                grid.cells[r * columns + c] = value;
            }
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Result<&Value, Fault> {
        let at = self.offset(row, column)?;
        Ok(&self.cells[at])
    }

    pub fn set(&mut self, row: usize, column: usize, value: impl Into<Value>) -> Result<(), Fault> {
        let at = self.offset(row, column)?;
        self.cells[at] = value.into();
        Ok(())
    }

    /// Cells of one row, left to right. Panics-free: out-of-range rows yield an empty slice.
    pub fn row(&self, row: usize) -> &[Value] {
        if row >= self.rows {
            return &[];
        }
        &self.cells[row * self.columns..(row + 1) * self.columns]
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Value] {
        &mut self.cells
    }

    fn offset(&self, row: usize, column: usize) -> Result<usize, Fault> {
        if row >= self.rows {
            return Err(Fault::index_error(format!(
                "row index ({row}) can't be < 0 or >= num_rows ({})",
                self.rows
            )));
        }
        if column >= self.columns {
            return Err(Fault::index_error(format!(
                "column index ({column}) can't be < 0 or >= num_columns ({})",
                self.columns
            )));
        }
        Ok(row * self.columns + column)
    }
}

/// FIFO queue.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    items: VecDeque<Value>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, value: impl Into<Value>) {
        self.items.push_back(value.into());
    }

    pub fn dequeue(&mut self) -> Result<Value, Fault> {
        self.items.pop_front().ok_or_else(|| Fault::queue_underflow("dequeue()"))
    }

    pub fn front(&self) -> Result<&Value, Fault> {
        self.items.front().ok_or_else(|| Fault::queue_underflow("front()"))
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Elements front to back, without dequeuing.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.items.iter_mut()
    }
}

/// LIFO stack.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    // bottom first, top last
    items: Vec<Value>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    pub fn pop(&mut self) -> Result<Value, Fault> {
        self.items.pop().ok_or_else(|| Fault::stack_underflow("pop()"))
    }

    pub fn top(&self) -> Result<&Value, Fault> {
        self.items.last().ok_or_else(|| Fault::stack_underflow("top()"))
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Elements top to bottom, without popping.
    pub fn iter_from_top(&self) -> impl Iterator<Item = &Value> {
        self.items.iter().rev()
    }

    /// Elements bottom to top (the order they were pushed).
    pub fn iter_from_bottom(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub(crate) fn values_mut(&mut self) -> &mut [Value] {
        &mut self.items
    }
}
