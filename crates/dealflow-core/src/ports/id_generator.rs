//! IdGenerator port - ID 生成の抽象化
//!
//! ID はストアが採番する（RDB の主キーと同じ扱い）。
//!
//! # 実装
//! - UlidGenerator: Clock から時刻部分を取る ULID 生成器
//!
//! # ULID の特性
//! - 先頭 48bit がミリ秒タイムスタンプなので生成順にソートできる
//! - 同一ミリ秒内の順序はランダム部分で決まる（タイムラインの tie-break に使う）

use crate::domain::ids::{CompanyId, DealId, MessageId, TaskId};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は作成時刻順にソートできる ID を生成
///
/// # Thread Safety
/// - `Send + Sync` 必須（1 つの生成器を複数ストアで共有する）
pub trait IdGenerator: Send + Sync {
    /// Company ID を生成
    fn generate_company_id(&self) -> CompanyId;

    /// Deal ID を生成
    fn generate_deal_id(&self) -> DealId;

    /// Message ID を生成
    fn generate_message_id(&self) -> MessageId;

    /// Task ID を生成
    fn generate_task_id(&self) -> TaskId;
}

/// ULID ベースの IdGenerator
///
/// タイムスタンプ部分は注入された Clock から取る。
/// FixedClock ならタイムスタンプは固定で、ランダム部分だけが変わる。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_company_id(&self) -> CompanyId {
        CompanyId::from(self.next())
    }

    fn generate_deal_id(&self) -> DealId {
        DealId::from(self.next())
    }

    fn generate_message_id(&self) -> MessageId {
        MessageId::from(self.next())
    }

    fn generate_task_id(&self) -> TaskId {
        TaskId::from(self.next())
    }
}
