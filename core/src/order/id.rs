// restoration-core/src/order/id.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of an order: `WAR-` followed by eight uppercase hex digits.
///
/// Only well-formed identifiers can be constructed, so an `OrderId` is always
/// safe to use as a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed order id: {0:?}")]
pub struct MalformedOrderId(pub String);

impl OrderId {
  pub const PREFIX: &'static str = "WAR-";
  const SUFFIX_LEN: usize = 8;

  /// Draws a fresh identifier from a random v4 UUID.
  pub fn generate() -> Self {
    let raw = Uuid::new_v4().simple().to_string();
    OrderId(format!("{}{}", Self::PREFIX, raw[..Self::SUFFIX_LEN].to_ascii_uppercase()))
  }

  pub fn parse(candidate: &str) -> Result<Self, MalformedOrderId> {
    let well_formed = candidate
      .strip_prefix(Self::PREFIX)
      .is_some_and(|suffix| {
        suffix.len() == Self::SUFFIX_LEN && suffix.bytes().all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F'))
      });
    if well_formed {
      Ok(OrderId(candidate.to_string()))
    } else {
      Err(MalformedOrderId(candidate.to_string()))
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for OrderId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl FromStr for OrderId {
  type Err = MalformedOrderId;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    OrderId::parse(s)
  }
}

impl TryFrom<String> for OrderId {
  type Error = MalformedOrderId;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    OrderId::parse(&value)
  }
}

impl From<OrderId> for String {
  fn from(id: OrderId) -> Self {
    id.0
  }
}

impl AsRef<str> for OrderId {
  fn as_ref(&self) -> &str {
    &self.0
  }
}
