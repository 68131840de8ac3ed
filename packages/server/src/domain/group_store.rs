//! GroupStore trait 定義
//!
//! スタディグループの永続データ（メンバー一覧・タイトル・科目）への
//! 読み取り専用インターフェース。このサブシステムはグループを書き換えない。

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::error::GroupStoreError;
use super::value_object::{GroupId, UserId};

/// スタディグループの永続データ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub id: GroupId,
    pub title: String,
    pub subject: String,
    pub members: Vec<UserId>,
}

impl GroupRecord {
    /// 新しい GroupRecord を作成
    pub fn new(id: GroupId, title: String, subject: String, members: Vec<UserId>) -> Self {
        Self {
            id,
            title,
            subject,
            members,
        }
    }

    /// 指定したユーザーがグループのメンバーかどうか
    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|m| m == user_id)
    }
}

/// Group Store trait
///
/// 参加許可の判定に使うグループ情報の参照先。UseCase 層はこの trait に依存し、
/// プラットフォーム本体のデータベースがどこにあるかを知らない。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// グループ ID でグループを検索する
    ///
    /// # Returns
    ///
    /// * `Ok(Some(GroupRecord))` - グループが存在する
    /// * `Ok(None)` - グループが存在しない
    /// * `Err(GroupStoreError)` - 参照に失敗した（呼び出し側は安全側に倒す）
    async fn find_group_by_id(&self, id: &GroupId) -> Result<Option<GroupRecord>, GroupStoreError>;
}
