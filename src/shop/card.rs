//! Card field formatting (applied while the user types) and the submit-time checks.

use chrono::Datelike;
use chrono_tz::Tz;
use derive_more::{Display, Error};

use crate::models::payment::CardInput;

const CARD_NUMBER_DIGITS: usize = 16;
const CARD_NUMBER_GROUP: usize = 4;
const CVV_DIGITS: usize = 3;

/// First failing rule of [validate_card]. The display value is the message shown to the user.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum CardValidationError {
    #[display("유효한 카드번호를 입력해주세요 (16자리)")]
    InvalidCardNumber,
    #[display("유효기간을 MM/YY 형식으로 입력해주세요")]
    InvalidExpiryFormat,
    #[display("만료된 카드입니다.")]
    ExpiredCard,
    #[display("CVV는 3자리 숫자로 입력해주세요")]
    InvalidCvv,
}

/// Calendar month, ordered by year first and then month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of<D: Datelike>(date: &D) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Current month as seen from `tz`
    pub fn now_in(tz: Tz) -> Self {
        Self::of(&chrono::Utc::now().with_timezone(&tz))
    }
}

/// `MM/YY` expiry split into numbers, the year expanded to `20YY`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryDate {
    pub month: u32,
    pub year: i32,
}

impl ExpiryDate {
    /// Parses exactly two digits, a slash and two digits. The month range is not checked here.
    pub fn parse(value: &str) -> Result<Self, CardValidationError> {
        let (month, year) = value
            .split_once('/')
            .ok_or(CardValidationError::InvalidExpiryFormat)?;

        if !is_ascii_digits(month, 2) || !is_ascii_digits(year, 2) {
            return Err(CardValidationError::InvalidExpiryFormat);
        }

        let month = month
            .parse::<u32>()
            .map_err(|_| CardValidationError::InvalidExpiryFormat)?;
        let year = format!("20{year}")
            .parse::<i32>()
            .map_err(|_| CardValidationError::InvalidExpiryFormat)?;

        Ok(Self { month, year })
    }

    pub fn has_valid_month(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    /// A card stays valid through its whole expiry month
    pub fn is_expired_at(&self, today: YearMonth) -> bool {
        YearMonth::new(self.year, self.month) < today
    }
}

fn is_ascii_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

/// Removes every whitespace char from a card number
pub fn strip_card_number(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Strips whitespace and puts a space before every 4th char, e.g. "12345678" -> "1234 5678".
///
/// Only formats, the digit count is checked by [validate_card].
pub fn format_card_number(raw: &str) -> String {
    let stripped = strip_card_number(raw);
    let mut formatted = String::with_capacity(stripped.len() + stripped.len() / CARD_NUMBER_GROUP);

    for (i, c) in stripped.chars().enumerate() {
        if i > 0 && i % CARD_NUMBER_GROUP == 0 {
            formatted.push(' ');
        }
        formatted.push(c);
    }

    formatted
}

/// Keeps the digits only and, once there are more than two, renders them as `MM/YY`.
///
/// Digits past the fourth are dropped. The month is not clamped.
pub fn format_expiry_date(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() > 2 {
        let year: String = digits.chars().skip(2).take(2).collect();
        return format!("{}/{}", &digits[..2], year);
    }

    digits
}

/// Checks the card fields in order and reports the first failing rule:
/// card number, expiry format, expiry against `today`, cvv.
pub fn validate_card(card: &CardInput, today: YearMonth) -> Result<(), CardValidationError> {
    let card_number = strip_card_number(&card.card_number);
    if !is_ascii_digits(&card_number, CARD_NUMBER_DIGITS) {
        return Err(CardValidationError::InvalidCardNumber);
    }

    let expiry = ExpiryDate::parse(&card.expiry_date)?;
    if expiry.is_expired_at(today) {
        return Err(CardValidationError::ExpiredCard);
    }

    if !is_ascii_digits(&card.cvv, CVV_DIGITS) {
        return Err(CardValidationError::InvalidCvv);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(card_number: &str, expiry_date: &str, cvv: &str) -> CardInput {
        CardInput {
            card_number: card_number.to_string(),
            expiry_date: expiry_date.to_string(),
            cvv: cvv.to_string(),
            owner_name: "홍길동".to_string(),
            email: "buyer@example.com".to_string(),
        }
    }

    #[test]
    fn test_format_card_number_groups_by_four() {
        assert_eq!(format_card_number("1234567890123456"), "1234 5678 9012 3456");
        assert_eq!(format_card_number("1234 5678 9012 3456"), "1234 5678 9012 3456");
        assert_eq!(format_card_number("12345"), "1234 5");
        assert_eq!(format_card_number("1234"), "1234");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_format_card_number_never_pads() {
        for len in 1..=16 {
            let formatted = format_card_number(&"7".repeat(len));
            assert!(!formatted.starts_with(' ') && !formatted.ends_with(' '));
            assert_eq!(formatted.matches(' ').count(), (len - 1) / 4);
            for (i, chunk) in formatted.split(' ').enumerate() {
                let expected = if i < (len - 1) / 4 { 4 } else { len - 4 * i };
                assert_eq!(chunk.len(), expected);
            }
        }
    }

    #[test]
    fn test_format_card_number_regroups_messy_input() {
        assert_eq!(format_card_number("12 345\t678 9"), "1234 5678 9");
    }

    #[test]
    fn test_format_expiry_date() {
        assert_eq!(format_expiry_date("1"), "1");
        assert_eq!(format_expiry_date("12"), "12");
        assert_eq!(format_expiry_date("123"), "12/3");
        assert_eq!(format_expiry_date("1230"), "12/30");
        assert_eq!(format_expiry_date("12/30"), "12/30");
        assert_eq!(format_expiry_date("123045"), "12/30");
        assert_eq!(format_expiry_date("ab1c2"), "12");
        assert_eq!(format_expiry_date("13/99"), "13/99");
    }

    #[test]
    fn test_validate_card_accepts_valid_input() {
        let today = YearMonth::new(2025, 1);
        assert_eq!(validate_card(&card("1234 5678 9012 3456", "01/25", "123"), today), Ok(()));
        assert_eq!(validate_card(&card("1234567890123456", "12/30", "999"), today), Ok(()));
    }

    #[test]
    fn test_validate_card_rejects_card_number() {
        let today = YearMonth::new(2025, 1);
        for number in ["123456789012345", "12345678901234567", "1234 5678 9012 345a", ""] {
            assert_eq!(
                validate_card(&card(number, "12/30", "123"), today),
                Err(CardValidationError::InvalidCardNumber)
            );
        }
    }

    #[test]
    fn test_validate_card_rejects_expiry_format() {
        let today = YearMonth::new(2025, 1);
        for expiry in ["1230", "1/30", "12-30", "12/3", "ab/cd", "12/300"] {
            assert_eq!(
                validate_card(&card("1234567890123456", expiry, "123"), today),
                Err(CardValidationError::InvalidExpiryFormat)
            );
        }
    }

    #[test]
    fn test_validate_card_rejects_expired_card() {
        let today = YearMonth::new(2025, 1);
        assert_eq!(
            validate_card(&card("1234 5678 9012 3456", "01/20", "123"), today),
            Err(CardValidationError::ExpiredCard)
        );

        let today = YearMonth::new(2025, 6);
        assert_eq!(
            validate_card(&card("1234567890123456", "05/25", "123"), today),
            Err(CardValidationError::ExpiredCard)
        );
        assert_eq!(validate_card(&card("1234567890123456", "06/25", "123"), today), Ok(()));
    }

    #[test]
    fn test_validate_card_rejects_cvv() {
        let today = YearMonth::new(2025, 1);
        for cvv in ["12", "1234", "12a", ""] {
            assert_eq!(
                validate_card(&card("1234567890123456", "12/30", cvv), today),
                Err(CardValidationError::InvalidCvv)
            );
        }
    }

    #[test]
    fn test_validate_card_reports_first_failure() {
        let today = YearMonth::new(2025, 1);
        assert_eq!(
            validate_card(&card("123", "bad", "x"), today),
            Err(CardValidationError::InvalidCardNumber)
        );
        assert_eq!(
            validate_card(&card("1234567890123456", "01/20", "x"), today),
            Err(CardValidationError::ExpiredCard)
        );
    }

    #[test]
    fn test_expiry_date_parse() {
        let expiry = ExpiryDate::parse("07/29").unwrap();
        assert_eq!(expiry, ExpiryDate { month: 7, year: 2029 });
        assert!(expiry.has_valid_month());
        assert!(!ExpiryDate::parse("13/29").unwrap().has_valid_month());
        assert!(!ExpiryDate::parse("00/29").unwrap().has_valid_month());
    }

    #[test]
    fn test_year_month_ordering() {
        assert!(YearMonth::new(2024, 12) < YearMonth::new(2025, 1));
        assert!(YearMonth::new(2025, 2) > YearMonth::new(2025, 1));
        let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert_eq!(YearMonth::of(&date), YearMonth::new(2025, 3));
    }
}
