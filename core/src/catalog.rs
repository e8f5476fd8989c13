//! Closed token sets accepted by the travel service.
//!
//! Each set is an enum whose serde representation is the exact wire token,
//! so a query can only ever carry a value the service understands. Tokens
//! also parse back with `FromStr` for hosts that hold raw strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownToken;

macro_rules! token_set {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $token)] $variant, )+
        }

        impl $name {
            /// Every member, in presentation order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire token.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $token, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $token => Ok($name::$variant), )+
                    other => Err(UnknownToken {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

token_set! {
    /// Daily budget range, in US dollars.
    #[derive(Default)]
    Budget, "budget" {
        Under100 => "<100",
        #[default]
        From100To300 => "100-300",
        From300To600 => "300-600",
        Over600 => ">600",
    }
}

token_set! {
    TravelStyle, "travel style" {
        Adventure => "adventure",
        Relaxation => "relaxation",
        Cultural => "cultural",
        Foodie => "foodie",
        Beach => "beach",
        Urban => "urban",
    }
}

token_set! {
    /// Target languages, sent to the service by display name.
    #[derive(Default)]
    Language, "language" {
        #[default]
        Spanish => "Spanish",
        French => "French",
        German => "German",
        Italian => "Italian",
        Portuguese => "Portuguese",
        Japanese => "Japanese",
        Korean => "Korean",
        MandarinChinese => "Mandarin Chinese",
        Arabic => "Arabic",
        Thai => "Thai",
        Vietnamese => "Vietnamese",
        Hindi => "Hindi",
        Turkish => "Turkish",
        Greek => "Greek",
        Dutch => "Dutch",
    }
}

token_set! {
    /// Situation a phrase will be used in. No context means "general".
    TranslationContext, "translation context" {
        Restaurant => "ordering food at a restaurant",
        Directions => "asking for directions",
        Hotel => "booking a hotel",
        Shopping => "shopping",
        Emergency => "emergency situation",
        MakingFriends => "making friends",
        Transportation => "transportation",
    }
}

/// Interests offered as suggestions. Queries accept any interest string.
pub const INTEREST_SUGGESTIONS: &[&str] = &[
    "Adventure",
    "Culture",
    "Food",
    "Nature",
    "History",
    "Nightlife",
    "Shopping",
    "Relaxation",
];
