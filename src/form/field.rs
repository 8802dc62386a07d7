//! Typed field identifiers.

use std::fmt;
use std::hash::Hash;

/// A closed set of fields belonging to one form section
///
/// Implemented by enums declared through [`form_fields!`](crate::form_fields).
pub trait FormField: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {
    /// Dot-separated path of the field inside the section payload
    fn path(&self) -> &'static str;

    /// Every field of the form, in declaration order
    fn all() -> &'static [Self];

    /// Resolve a path received from outside (URL, server error map)
    fn from_path(path: &str) -> Option<Self> {
        Self::all().iter().copied().find(|field| field.path() == path)
    }
}

/// Declare a form's field enum together with its [`FormField`] implementation
///
/// # Examples
///
/// ```
/// use onboarding_core::form::FormField;
///
/// onboarding_core::form_fields! {
///     pub enum BankFields {
///         Iban => "stammdaten.iban",
///         Bic => "stammdaten.bic",
///     }
/// }
///
/// assert_eq!(BankFields::Iban.path(), "stammdaten.iban");
/// assert_eq!(BankFields::from_path("stammdaten.bic"), Some(BankFields::Bic));
/// assert_eq!(BankFields::from_path("stammdaten.bank"), None);
/// ```
#[macro_export]
macro_rules! form_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $path:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::form::FormField for $name {
            fn path(&self) -> &'static str {
                match self {
                    $( Self::$variant => $path ),+
                }
            }

            fn all() -> &'static [Self] {
                &[$( Self::$variant ),+]
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::form::FormField::path(self))
            }
        }
    };
}
