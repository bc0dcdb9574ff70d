use bitflags::bitflags;

bitflags! {
    /// What a numeric string may contain besides digits.
    ///
    /// Flag names follow the usual spreadsheet/.NET vocabulary so that
    /// configuration files can spell them directly, e.g.
    /// `"FLOAT | ALLOW_THOUSANDS"` or `"HEX_NUMBER"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NumberStyles: u32 {
        const ALLOW_LEADING_WHITE = 1;
        const ALLOW_TRAILING_WHITE = 1 << 1;
        const ALLOW_LEADING_SIGN = 1 << 2;
        const ALLOW_TRAILING_SIGN = 1 << 3;
        const ALLOW_PARENTHESES = 1 << 4;
        const ALLOW_DECIMAL_POINT = 1 << 5;
        const ALLOW_THOUSANDS = 1 << 6;
        const ALLOW_EXPONENT = 1 << 7;
        const ALLOW_CURRENCY_SYMBOL = 1 << 8;
        /// Digits are hexadecimal; no sign or prefix is accepted
        const ALLOW_HEX_SPECIFIER = 1 << 9;

        const INTEGER = Self::ALLOW_LEADING_WHITE.bits()
            | Self::ALLOW_TRAILING_WHITE.bits()
            | Self::ALLOW_LEADING_SIGN.bits();
        const HEX_NUMBER = Self::ALLOW_LEADING_WHITE.bits()
            | Self::ALLOW_TRAILING_WHITE.bits()
            | Self::ALLOW_HEX_SPECIFIER.bits();
        const NUMBER = Self::INTEGER.bits()
            | Self::ALLOW_TRAILING_SIGN.bits()
            | Self::ALLOW_DECIMAL_POINT.bits()
            | Self::ALLOW_THOUSANDS.bits();
        const FLOAT = Self::INTEGER.bits()
            | Self::ALLOW_DECIMAL_POINT.bits()
            | Self::ALLOW_EXPONENT.bits();
        const CURRENCY = Self::NUMBER.bits()
            | Self::ALLOW_PARENTHESES.bits()
            | Self::ALLOW_CURRENCY_SYMBOL.bits();
        const ANY = Self::CURRENCY.bits() | Self::ALLOW_EXPONENT.bits();
    }
}

impl NumberStyles {
    /// Default style for floating point targets.
    pub const FLOAT_AND_THOUSANDS: NumberStyles =
        NumberStyles::FLOAT.union(NumberStyles::ALLOW_THOUSANDS);

    pub fn is_hex(&self) -> bool {
        self.contains(NumberStyles::ALLOW_HEX_SPECIFIER)
    }
}

bitflags! {
    /// How ambiguous date strings are interpreted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DateTimeStyles: u32 {
        /// Time-only text gets date 0001-01-01 instead of today
        const NO_CURRENT_DATE_DEFAULT = 1;
        /// Convert to UTC when the text (or `ASSUME_LOCAL`) names a zone
        const ADJUST_TO_UNIVERSAL = 1 << 1;
        /// Text without an offset is local time
        const ASSUME_LOCAL = 1 << 2;
        /// Text without an offset is UTC
        const ASSUME_UNIVERSAL = 1 << 3;
    }
}
