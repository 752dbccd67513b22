use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};

use std::fmt;

/// チケットの一意識別子
/// ストアが作成時に採番する整数ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TicketId(i64);

impl TicketId {
    /// 整数値からTicketIdを作成
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// 内部の整数値を取得
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// イベントの一意識別子
/// チケットが所属するイベントへの参照（所有関係ではない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(i64);

impl EventId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 価格を表す値オブジェクト
/// 通貨の最小単位（セントなど）の整数で保持し、負の値は許可しない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price(i64);

impl Price {
    /// 金額から価格を作成
    ///
    /// # Returns
    /// * `Ok(Price)` - 0以上の金額
    /// * `Err(DomainError::InvalidPrice)` - 負の金額
    pub fn new(amount: i64) -> Result<Self, DomainError> {
        if amount < 0 {
            return Err(DomainError::InvalidPrice(amount));
        }
        Ok(Self(amount))
    }

    /// 金額を取得
    pub fn amount(&self) -> i64 {
        self.0
    }
}

/// 販売・払い戻しの数量
/// 1以上であることが保証される。上限は設けず、在庫との比較は集約側で行う
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity(u64);

impl Quantity {
    /// 呼び出し側から受け取った数量を検証して作成
    ///
    /// # Returns
    /// * `Ok(Quantity)` - 1以上の数量
    /// * `Err(DomainError::InvalidQuantity)` - 0以下の数量
    pub fn new(value: i64) -> Result<Self, DomainError> {
        u64::try_from(value)
            .ok()
            .filter(|&value| value > 0)
            .map(Self)
            .ok_or(DomainError::InvalidQuantity(value))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 楽観的並行性制御のバージョントークン
/// 在庫の書き込みが成功するたびに1つ進む
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(u64);

impl Version {
    /// 作成直後のバージョン
    pub const INITIAL: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// 次のバージョンを取得
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
