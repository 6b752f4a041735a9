//! Выбор мест для брони.
//!
//! Чистая логика без ввода-вывода: на вход подаётся снимок свободных мест,
//! на выходе либо ровно `count` мест, либо ничего. Две фазы:
//!
//! 1. **Один ряд.** Места группируются по рядам (ряды по возрастанию номера),
//!    внутри ряда окно ширины `count` скользит слева направо. Окно подходит,
//!    только если `last.id - first.id == count - 1`, то есть места идут подряд
//!    без дырок от прошлых броней. Берётся первое подходящее окно.
//! 2. **Минимальный разброс.** Если ни один ряд не подошёл, все свободные места
//!    сортируются по id без учёта рядов и выбирается окно с минимальным
//!    `last.id - first.id`; при равенстве побеждает самое левое.
//!
//! Фаза 1 пробуется всегда, даже если фаза 2 дала бы такой же разброс.

use std::collections::BTreeMap;

use crate::models::{FreeSeat, RowNumber, SeatId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Непрерывный блок в одном ряду
    SameRow,
    /// Окно с минимальным разбросом id поверх всех рядов
    ClosestSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub seats: Vec<FreeSeat>,
    pub strategy: Strategy,
}

impl Selection {
    pub fn seat_ids(&self) -> Vec<SeatId> {
        self.seats.iter().map(|s| s.id).collect()
    }

    /// Разница между максимальным и минимальным id выбранных мест.
    pub fn span(&self) -> i64 {
        match (self.seats.first(), self.seats.last()) {
            (Some(first), Some(last)) => last.id - first.id,
            _ => 0,
        }
    }
}

/// Выбирает `count` мест из `free` или возвращает `None`, если запрос
/// невыполним. Частичный результат не возвращается никогда.
///
/// Порядок `free` не важен; повторяющиеся id учитываются один раз.
pub fn select_seats(free: &[FreeSeat], count: usize) -> Option<Selection> {
    if count == 0 || free.len() < count {
        return None;
    }

    if let Some(seats) = find_in_one_row(free, count) {
        return Some(Selection {
            seats,
            strategy: Strategy::SameRow,
        });
    }

    find_closest(free, count).map(|seats| Selection {
        seats,
        strategy: Strategy::ClosestSpan,
    })
}

fn find_in_one_row(free: &[FreeSeat], count: usize) -> Option<Vec<FreeSeat>> {
    let mut rows: BTreeMap<RowNumber, Vec<FreeSeat>> = BTreeMap::new();
    for seat in free {
        rows.entry(seat.row_number).or_default().push(*seat);
    }

    let gapless_span = count as i64 - 1;
    rows.into_values().find_map(|mut row| {
        if row.len() < count {
            return None;
        }
        row.sort_unstable_by_key(|s| s.id);
        row.dedup_by_key(|s| s.id);
        row.windows(count)
            .find(|window| window[count - 1].id - window[0].id == gapless_span)
            .map(<[FreeSeat]>::to_vec)
    })
}

fn find_closest(free: &[FreeSeat], count: usize) -> Option<Vec<FreeSeat>> {
    let mut sorted = free.to_vec();
    sorted.sort_unstable_by_key(|s| s.id);
    sorted.dedup_by_key(|s| s.id);

    // min_by_key отдаёт первый из равных минимумов, то есть самое левое окно
    sorted
        .windows(count)
        .min_by_key(|window| window[count - 1].id - window[0].id)
        .map(<[FreeSeat]>::to_vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seats(pairs: &[(SeatId, RowNumber)]) -> Vec<FreeSeat> {
        pairs
            .iter()
            .map(|&(id, row_number)| FreeSeat { id, row_number })
            .collect()
    }

    fn ids(selection: &Option<Selection>) -> Vec<SeatId> {
        selection.as_ref().map(Selection::seat_ids).unwrap_or_default()
    }

    #[test]
    fn picks_first_block_in_first_row() {
        let free = seats(&[(1, 1), (2, 1), (3, 1), (4, 1), (5, 2), (6, 2), (7, 2), (8, 2)]);
        let selection = select_seats(&free, 3);

        assert_eq!(ids(&selection), vec![1, 2, 3]);
        assert_eq!(selection.unwrap().strategy, Strategy::SameRow);
    }

    #[test]
    fn skips_rows_with_gaps() {
        // ряд 1: 1,2,_,4,5 — ни одного блока из трёх
        let free = seats(&[(1, 1), (2, 1), (4, 1), (5, 1), (8, 2), (9, 2), (10, 2)]);
        let selection = select_seats(&free, 3);

        assert_eq!(ids(&selection), vec![8, 9, 10]);
        assert_eq!(selection.unwrap().strategy, Strategy::SameRow);
    }

    #[test]
    fn leftmost_window_inside_a_row() {
        let free = seats(&[(1, 1), (3, 1), (4, 1), (5, 1), (6, 1)]);
        assert_eq!(ids(&select_seats(&free, 2)), vec![3, 4]);
    }

    #[test]
    fn rows_are_scanned_by_row_number_not_input_order() {
        let free = seats(&[(15, 3), (16, 3), (8, 2), (9, 2)]);
        assert_eq!(ids(&select_seats(&free, 2)), vec![8, 9]);
    }

    #[test]
    fn same_row_wins_even_when_span_is_equal_across_rows() {
        // 4 и 5 стоят рядом по id, но в разных рядах; блок 9,10 в одном ряду
        let free = seats(&[(4, 1), (5, 2), (9, 2), (10, 2)]);
        let selection = select_seats(&free, 2).unwrap();

        assert_eq!(selection.seat_ids(), vec![9, 10]);
        assert_eq!(selection.strategy, Strategy::SameRow);
    }

    #[test]
    fn falls_back_to_minimal_span() {
        let free = seats(&[(4, 1), (8, 2), (12, 3), (13, 4)]);
        let selection = select_seats(&free, 2).unwrap();

        assert_eq!(selection.seat_ids(), vec![12, 13]);
        assert_eq!(selection.strategy, Strategy::ClosestSpan);
        assert_eq!(selection.span(), 1);
    }

    #[test]
    fn minimal_span_ties_go_to_the_leftmost_window() {
        let free = seats(&[(1, 1), (3, 2), (5, 3), (7, 4)]);
        let selection = select_seats(&free, 2).unwrap();

        assert_eq!(selection.seat_ids(), vec![1, 3]);
        assert_eq!(selection.span(), 2);
    }

    #[test]
    fn fallback_ignores_row_boundaries() {
        let free = seats(&[(4, 1), (8, 2)]);
        let selection = select_seats(&free, 2).unwrap();

        assert_eq!(selection.seat_ids(), vec![4, 8]);
        assert_eq!(selection.strategy, Strategy::ClosestSpan);
    }

    #[test]
    fn not_enough_free_seats() {
        let free = seats(&[(4, 1), (8, 2)]);
        assert_eq!(select_seats(&free, 3), None);
        assert_eq!(select_seats(&[], 1), None);
    }

    #[test]
    fn zero_seats_is_never_satisfiable() {
        let free = seats(&[(1, 1)]);
        assert_eq!(select_seats(&free, 0), None);
    }

    #[test]
    fn duplicate_ids_are_counted_once() {
        let free = seats(&[(1, 1), (1, 1), (3, 1)]);
        let selection = select_seats(&free, 2).unwrap();

        assert_eq!(selection.seat_ids(), vec![1, 3]);
        assert_eq!(select_seats(&seats(&[(1, 1), (1, 1)]), 2), None);
    }
}
