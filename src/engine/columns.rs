use serde::{Deserialize, Serialize};

/// Decimal digits of `n`, most-significant first. Zero has a single digit.
pub fn digits(n: u32) -> Vec<u8> {
    n.to_string().bytes().map(|b| b - b'0').collect()
}

pub fn digit_count(n: u32) -> usize {
    n.checked_ilog10().map_or(1, |l| l as usize + 1)
}

/// Left-pads with zeros to `width` columns. Never truncates.
pub fn padded_digits(n: u32, width: usize) -> Vec<u8> {
    let raw = digits(n);
    let mut out = vec![0; width.saturating_sub(raw.len())];
    out.extend(raw);
    out
}

/// Place-value name of a storage column. Storage is most-significant first,
/// so the rightmost column (`num_cols - 1`) is the ones column.
pub fn column_name(col: usize, num_cols: usize) -> &'static str {
    match num_cols.saturating_sub(col + 1) {
        0 => "ones",
        1 => "tens",
        2 => "hundreds",
        3 => "thousands",
        _ => "ten-thousands",
    }
}

pub fn column_title(col: usize, num_cols: usize) -> String {
    let name = column_name(col, num_cols);
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Column layout of `a + b`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddColumns {
    pub a: u32,
    pub b: u32,
    pub a_digits: Vec<u8>,
    pub b_digits: Vec<u8>,
    pub result_digits: Vec<u8>,
    /// `carries[i]` is the carry produced by column `i` into column `i - 1`.
    pub carries: Vec<u8>,
}

impl AddColumns {
    pub fn new(a: u32, b: u32) -> Self {
        let sum = a + b;
        let num_cols = digit_count(sum).max(digit_count(a)).max(digit_count(b));
        let a_digits = padded_digits(a, num_cols);
        let b_digits = padded_digits(b, num_cols);
        let result_digits = padded_digits(sum, num_cols);

        let mut carries = vec![0; num_cols];
        let mut carry = 0;
        for i in (0..num_cols).rev() {
            let column_sum = a_digits[i] + b_digits[i] + carry;
            carry = column_sum / 10;
            carries[i] = carry;
        }
        debug_assert_eq!(carries[0], 0, "sum width leaves room for the final carry");

        Self {
            a,
            b,
            a_digits,
            b_digits,
            result_digits,
            carries,
        }
    }

    pub fn num_cols(&self) -> usize {
        self.result_digits.len()
    }

    pub fn result(&self) -> u32 {
        self.a + self.b
    }

    /// Carry arriving at `col` from the column to its right.
    pub fn carry_in(&self, col: usize) -> u8 {
        self.carries.get(col + 1).copied().unwrap_or(0)
    }

    /// Carry leaving `col` for the column to its left.
    pub fn carry_out(&self, col: usize) -> u8 {
        if col == 0 { 0 } else { self.carries[col] }
    }

    /// Full column sum including the incoming carry, e.g. 12 for 7 + 5.
    pub fn column_sum(&self, col: usize) -> u8 {
        self.a_digits[col] + self.b_digits[col] + self.carry_in(col)
    }

    /// Leading column created purely by the final carry: both operand digits
    /// are padding zeros but the result digit is not.
    pub fn has_carry_only_lead(&self) -> bool {
        self.a_digits[0] == 0 && self.b_digits[0] == 0 && self.result_digits[0] > 0
    }
}

/// Column layout of `a - b`. Operand generators keep `a >= b`; a reversed
/// pair still lays out, with the last borrow finding no lender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubColumns {
    pub a: u32,
    pub b: u32,
    pub a_digits: Vec<u8>,
    pub b_digits: Vec<u8>,
    /// Per-column differences after borrowing. Equal to the padded digits of
    /// `a - b` whenever `a >= b`.
    pub result_digits: Vec<u8>,
    /// `borrows[i]` is true when column `i` had to borrow from the left.
    pub borrows: Vec<bool>,
    /// Minuend digits after every borrow has cascaded through.
    pub modified_a: Vec<u8>,
}

impl SubColumns {
    pub fn new(a: u32, b: u32) -> Self {
        let num_cols = digit_count(a).max(digit_count(b));
        let a_digits = padded_digits(a, num_cols);
        let b_digits = padded_digits(b, num_cols);

        let mut borrows = vec![false; num_cols];
        let mut modified_a = a_digits.clone();
        for i in (0..num_cols).rev() {
            if modified_a[i] < b_digits[i] {
                borrows[i] = true;
                cascade_borrow(&mut modified_a, i);
            }
        }

        let result_digits = modified_a
            .iter()
            .zip(&b_digits)
            .map(|(top, bottom)| top - bottom)
            .collect();

        Self {
            a,
            b,
            a_digits,
            b_digits,
            result_digits,
            borrows,
            modified_a,
        }
    }

    pub fn num_cols(&self) -> usize {
        self.a_digits.len()
    }

    pub fn column_difference(&self, col: usize) -> u8 {
        self.modified_a[col] - self.b_digits[col]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitChange {
    pub column: usize,
    pub before: u8,
    pub after: u8,
}

/// Record of one borrow: which column received ten and which digits changed
/// on the way to the lender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowTrace {
    pub column: usize,
    pub original: u8,
    pub raised: u8,
    /// Columns to the left that changed, nearest first. Zeros become 9; the
    /// last entry is the lender being decremented.
    pub changes: Vec<DigitChange>,
    /// `None` only when no nonzero digit exists to the left, which cannot
    /// happen for `a >= b`.
    pub lender: Option<usize>,
}

/// Adds ten to `digits[col]` and takes one from the nearest nonzero digit to
/// its left, turning every zero passed on the way into 9.
pub fn cascade_borrow(digits: &mut [u8], col: usize) -> BorrowTrace {
    let original = digits[col];
    digits[col] += 10;

    let mut changes = Vec::new();
    let mut lender = None;
    for j in (0..col).rev() {
        let before = digits[j];
        if before == 0 {
            digits[j] = 9;
            changes.push(DigitChange {
                column: j,
                before,
                after: 9,
            });
        } else {
            digits[j] -= 1;
            changes.push(DigitChange {
                column: j,
                before,
                after: digits[j],
            });
            lender = Some(j);
            break;
        }
    }

    BorrowTrace {
        column: col,
        original,
        raised: digits[col],
        changes,
        lender,
    }
}
