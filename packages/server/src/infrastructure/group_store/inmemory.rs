//! InMemory Group Store 実装
//!
//! ドメイン層が定義する GroupStore trait の具体的な実装。
//! 起動時にシードファイル（JSON）から読み込んだグループを保持します。
//!
//! ## 設計ノート
//!
//! このサブシステムはグループを書き換えないため、構築後は不変の
//! HashMap として保持します（ロック不要）。プラットフォーム本体の
//! データベースを参照する実装に置き換える場合も trait は変わりません。

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{GroupId, GroupRecord, GroupStore, GroupStoreError, UserId};

/// シードファイルの読み込みエラー
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid group entry: {0}")]
    InvalidEntry(String),
}

/// シードファイル内の 1 グループ分のエントリ
#[derive(Debug, Deserialize)]
struct GroupSeed {
    id: String,
    title: String,
    #[serde(default)]
    subject: String,
    members: Vec<String>,
}

/// インメモリ Group Store 実装
pub struct InMemoryGroupStore {
    /// GroupId → グループの永続データ
    groups: HashMap<GroupId, GroupRecord>,
}

impl InMemoryGroupStore {
    /// グループを持たない空の InMemoryGroupStore を作成
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    /// 指定したグループ一覧を保持する InMemoryGroupStore を作成
    pub fn with_groups(groups: Vec<GroupRecord>) -> Self {
        Self {
            groups: groups.into_iter().map(|g| (g.id.clone(), g)).collect(),
        }
    }

    /// シードファイル（JSON）からグループを読み込んで作成
    ///
    /// ファイル形式は `[{"id", "title", "subject", "members": [...]}, ...]`。
    /// 不正なエントリが 1 つでもあれば起動を失敗させる（fail-fast）。
    pub fn from_seed_file(path: &Path) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        let seeds: Vec<GroupSeed> = serde_json::from_str(&raw)?;

        let mut groups = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let id = GroupId::new(seed.id.clone())
                .map_err(|e| SeedError::InvalidEntry(format!("group '{}': {}", seed.id, e)))?;
            let mut members = Vec::with_capacity(seed.members.len());
            for member in seed.members {
                let user_id = UserId::new(member)
                    .map_err(|e| SeedError::InvalidEntry(format!("group '{}': {}", seed.id, e)))?;
                members.push(user_id);
            }
            groups.push(GroupRecord::new(id, seed.title, seed.subject, members));
        }

        Ok(Self::with_groups(groups))
    }

    /// 保持しているグループ数
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// グループを 1 つも保持していないかどうか
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for InMemoryGroupStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GroupStore for InMemoryGroupStore {
    async fn find_group_by_id(&self, id: &GroupId) -> Result<Option<GroupRecord>, GroupStoreError> {
        Ok(self.groups.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryGroupStore の検索とシードファイルの読み込み
    //
    // 【なぜこのテストが必要か】
    // - 参加許可の判定はこの Store の検索結果に依存する
    // - シードファイルの形式エラーは起動時に検出される必要がある
    //
    // 【どのようなシナリオをテストするか】
    // 1. 登録済みグループの検索成功
    // 2. 未登録グループの検索（None）
    // 3. シードファイルからの読み込み成功
    // 4. 不正なシードファイル（JSON 構文エラー・空 ID）
    // ========================================

    fn test_record(id: &str, members: &[&str]) -> GroupRecord {
        GroupRecord::new(
            GroupId::new(id.to_string()).unwrap(),
            "Algebra Study".to_string(),
            "Mathematics".to_string(),
            members
                .iter()
                .map(|m| UserId::new(m.to_string()).unwrap())
                .collect(),
        )
    }

    fn write_temp_seed(content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("juku-seed-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_find_group_by_id_success() {
        // テスト項目: 登録済みのグループを ID で検索できる
        // given (前提条件):
        let store = InMemoryGroupStore::with_groups(vec![test_record("g1", &["u1", "u2"])]);

        // when (操作):
        let result = store
            .find_group_by_id(&GroupId::new("g1".to_string()).unwrap())
            .await
            .unwrap();

        // then (期待する結果):
        let record = result.unwrap();
        assert_eq!(record.title, "Algebra Study");
        assert_eq!(record.members.len(), 2);
    }

    #[tokio::test]
    async fn test_find_group_by_id_not_found() {
        // テスト項目: 未登録のグループは None を返す
        // given (前提条件):
        let store = InMemoryGroupStore::new();

        // when (操作):
        let result = store
            .find_group_by_id(&GroupId::new("missing".to_string()).unwrap())
            .await
            .unwrap();

        // then (期待する結果):
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_from_seed_file_success() {
        // テスト項目: シードファイルからグループを読み込める
        // given (前提条件):
        let path = write_temp_seed(
            r#"[
                {"id": "g1", "title": "Algebra Study", "subject": "math", "members": ["u1", "u2"]},
                {"id": "g2", "title": "World History", "members": ["u3"]}
            ]"#,
        );

        // when (操作):
        let store = InMemoryGroupStore::from_seed_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        // then (期待する結果): subject 省略時は空文字列になる
        assert_eq!(store.len(), 2);
        let g2 = store
            .find_group_by_id(&GroupId::new("g2".to_string()).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(g2.title, "World History");
        assert_eq!(g2.subject, "");
    }

    #[test]
    fn test_from_seed_file_rejects_invalid_json() {
        // テスト項目: JSON として不正なシードファイルはエラーになる
        // given (前提条件):
        let path = write_temp_seed("not json at all");

        // when (操作):
        let result = InMemoryGroupStore::from_seed_file(&path);
        std::fs::remove_file(&path).unwrap();

        // then (期待する結果):
        assert!(matches!(result, Err(SeedError::Parse(_))));
    }

    #[test]
    fn test_from_seed_file_rejects_blank_group_id() {
        // テスト項目: 空の ID を持つエントリはエラーになる
        // given (前提条件):
        let path = write_temp_seed(r#"[{"id": "", "title": "Bad", "members": []}]"#);

        // when (操作):
        let result = InMemoryGroupStore::from_seed_file(&path);
        std::fs::remove_file(&path).unwrap();

        // then (期待する結果):
        assert!(matches!(result, Err(SeedError::InvalidEntry(_))));
    }

    #[test]
    fn test_from_seed_file_missing_file() {
        // テスト項目: 存在しないファイルはエラーになる
        // given (前提条件):
        let path = std::env::temp_dir().join("juku-seed-does-not-exist.json");

        // when (操作):
        let result = InMemoryGroupStore::from_seed_file(&path);

        // then (期待する結果):
        assert!(matches!(result, Err(SeedError::Io(_))));
    }
}
