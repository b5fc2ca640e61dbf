//! Assertions which are only checked when the configured assertion level is high enough.
//!
//! Expected domain wipeouts are reported through [`crate::basic_types::Inconsistency`]; these
//! macros are reserved for violated internal contracts.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const HAMILTON_ASSERT_LEVEL_DEFINITION: u8 = HAMILTON_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const HAMILTON_ASSERT_LEVEL_DEFINITION: u8 = HAMILTON_ASSERT_ADVANCED;

pub const HAMILTON_ASSERT_SIMPLE: u8 = 1;
pub const HAMILTON_ASSERT_MODERATE: u8 = 2;
pub const HAMILTON_ASSERT_ADVANCED: u8 = 3;
pub const HAMILTON_ASSERT_EXTREME: u8 = 4;

#[macro_export]
#[doc(hidden)]
macro_rules! hamilton_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::HAMILTON_ASSERT_LEVEL_DEFINITION
            >= $crate::asserts::HAMILTON_ASSERT_SIMPLE
        {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! hamilton_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::HAMILTON_ASSERT_LEVEL_DEFINITION
            >= $crate::asserts::HAMILTON_ASSERT_SIMPLE
        {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! hamilton_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::HAMILTON_ASSERT_LEVEL_DEFINITION
            >= $crate::asserts::HAMILTON_ASSERT_MODERATE
        {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! hamilton_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::HAMILTON_ASSERT_LEVEL_DEFINITION
            >= $crate::asserts::HAMILTON_ASSERT_ADVANCED
        {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! hamilton_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::asserts::HAMILTON_ASSERT_LEVEL_DEFINITION
            >= $crate::asserts::HAMILTON_ASSERT_EXTREME
        {
            assert!($($arg)*);
        }
    };
}
