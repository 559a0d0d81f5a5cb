/// Implements the standard arithmetic operator traits for a single-field newtype.
///
/// The newtype must provide `value()` returning the inner value and a `From`
/// conversion back from it. Three forms are supported:
/// * `op!(binary T, Add, add)` for `T op T -> T` operators
/// * `op!(inplace T, SubAssign, sub_assign)` for `T op= T` operators
/// * `op!(unary T, Neg, neg)` for `op T -> T` operators
#[macro_export]
macro_rules! op {
    (binary $t:ty, $imp:ident, $method:ident) => {
        impl std::ops::$imp for $t {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self::from(std::ops::$imp::$method(self.value(), rhs.value()))
            }
        }
    };
    (inplace $t:ty, $imp:ident, $method:ident) => {
        impl std::ops::$imp for $t {
            fn $method(&mut self, rhs: Self) {
                let mut value = self.value();
                std::ops::$imp::$method(&mut value, rhs.value());
                *self = Self::from(value);
            }
        }
    };
    (unary $t:ty, $imp:ident, $method:ident) => {
        impl std::ops::$imp for $t {
            type Output = Self;

            fn $method(self) -> Self::Output {
                Self::from(std::ops::$imp::$method(self.value()))
            }
        }
    };
}
