//! The inventory record and the payloads that mutate it

use serde::{Deserialize, Serialize};
use std::fmt;

/// One stock line of socks, as persisted by a [`SockStore`](crate::core::SockStore)
///
/// `id` is assigned by the store on insert and never changes afterwards.
/// Two records are the same logical stock line when their [`SkuKey`] matches,
/// regardless of `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sock {
    pub id: i64,
    pub color: String,
    pub cotton_percentage: i32,
    pub quantity: i32,
}

impl Sock {
    /// The merge key of this record
    pub fn key(&self) -> SkuKey {
        SkuKey::new(self.color.clone(), self.cotton_percentage)
    }

    /// Overwrite every mutable field from a payload, keeping `id`
    pub fn apply(&mut self, payload: &SockPayload) {
        self.color = payload.color.clone();
        self.cotton_percentage = payload.cotton_percentage;
        self.quantity = payload.quantity;
    }
}

/// A record that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSock {
    pub color: String,
    pub cotton_percentage: i32,
    pub quantity: i32,
}

impl NewSock {
    pub fn new(key: SkuKey, quantity: i32) -> Self {
        Self {
            color: key.color,
            cotton_percentage: key.cotton_percentage,
            quantity,
        }
    }

    /// Attach the id handed out by the store
    pub fn with_id(self, id: i64) -> Sock {
        Sock {
            id,
            color: self.color,
            cotton_percentage: self.cotton_percentage,
            quantity: self.quantity,
        }
    }
}

/// Request body for income, outcome and replace
///
/// Mirrors the wire shape of [`Sock`]; an `id` sent by the client is accepted
/// and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SockPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub color: String,
    pub cotton_percentage: i32,
    pub quantity: i32,
}

impl SockPayload {
    pub fn new(color: impl Into<String>, cotton_percentage: i32, quantity: i32) -> Self {
        Self {
            id: None,
            color: color.into(),
            cotton_percentage,
            quantity,
        }
    }

    pub fn key(&self) -> SkuKey {
        SkuKey::new(self.color.clone(), self.cotton_percentage)
    }
}

/// The (color, cotton percentage) pair identifying one stock line
///
/// Color comparison is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SkuKey {
    pub color: String,
    pub cotton_percentage: i32,
}

impl SkuKey {
    pub fn new(color: impl Into<String>, cotton_percentage: i32) -> Self {
        Self {
            color: color.into(),
            cotton_percentage,
        }
    }

    pub fn matches(&self, sock: &Sock) -> bool {
        sock.color == self.color && sock.cotton_percentage == self.cotton_percentage
    }
}

impl fmt::Display for SkuKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}%", self.color, self.cotton_percentage)
    }
}
