use std::str::FromStr;

use super::seat::{RowNumber, Seat, SeatId};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("seat layout must contain at least one row")]
    Empty,
    #[error("row {0} has no seats")]
    EmptyRow(usize),
    #[error("invalid row size {0:?}")]
    InvalidRowSize(String),
}

/// Раскладка зала: количество мест в каждом ряду, ряды нумеруются с 1.
///
/// Id мест выдаются подряд начиная с 1 в порядке рядов, поэтому соседние id
/// внутри ряда всегда соответствуют соседним местам.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatLayout {
    rows: Vec<u32>,
}

impl SeatLayout {
    pub fn new(rows: Vec<u32>) -> Result<Self, LayoutError> {
        if rows.is_empty() {
            return Err(LayoutError::Empty);
        }
        if let Some(pos) = rows.iter().position(|&size| size == 0) {
            return Err(LayoutError::EmptyRow(pos + 1));
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    pub fn total_seats(&self) -> u64 {
        self.rows.iter().map(|&size| u64::from(size)).sum()
    }

    pub fn seats(&self) -> Vec<Seat> {
        let mut next_id: SeatId = 1;
        let mut seats = Vec::with_capacity(self.total_seats() as usize);
        for (index, &size) in self.rows.iter().enumerate() {
            let row_number = (index + 1) as RowNumber;
            for _ in 0..size {
                seats.push(Seat::free(next_id, row_number));
                next_id += 1;
            }
        }
        seats
    }
}

impl Default for SeatLayout {
    // 80 мест: 11 рядов по 7 и последний ряд из 3
    fn default() -> Self {
        let mut rows = vec![7; 11];
        rows.push(3);
        Self { rows }
    }
}

impl FromStr for SeatLayout {
    type Err = LayoutError;

    /// Формат: размеры рядов через запятую, например `7,7,7,3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| LayoutError::InvalidRowSize(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_has_eighty_seats() {
        let layout = SeatLayout::default();
        assert_eq!(layout.total_seats(), 80);
        assert_eq!(layout.rows().len(), 12);

        let seats = layout.seats();
        assert_eq!(seats.first().map(|s| (s.id, s.row_number)), Some((1, 1)));
        assert_eq!(seats.last().map(|s| (s.id, s.row_number)), Some((80, 12)));
    }

    #[test]
    fn ids_are_consecutive_across_rows() {
        let layout: SeatLayout = "4, 4".parse().unwrap();
        let seats = layout.seats();

        let ids: Vec<_> = seats.iter().map(|s| s.id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        assert!(seats[..4].iter().all(|s| s.row_number == 1));
        assert!(seats[4..].iter().all(|s| s.row_number == 2));
        assert!(seats.iter().all(|s| !s.is_booked && s.held_by.is_none()));
    }

    #[test]
    fn rejects_bad_layouts() {
        assert_eq!("".parse::<SeatLayout>(), Err(LayoutError::Empty));
        assert_eq!("7,0,7".parse::<SeatLayout>(), Err(LayoutError::EmptyRow(2)));
        assert_eq!(
            "7,x".parse::<SeatLayout>(),
            Err(LayoutError::InvalidRowSize("x".to_string()))
        );
    }
}
