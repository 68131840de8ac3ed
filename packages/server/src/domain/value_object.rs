//! 値オブジェクト定義
//!
//! セッション調整サブシステムで使う ID・名前・本文などの値オブジェクト。
//! すべて検証付きのコンストラクタを持ち、不正な値はドメインに入らない。

use std::fmt;

use uuid::Uuid;

use super::error::ValidationError;

/// スタディグループ ID（プラットフォーム側で発行される不透明な文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupId(String);

impl GroupId {
    /// 新しい GroupId を作成（空文字列は不可）
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyGroupId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// プラットフォーム上のユーザー ID
///
/// 表示名とは別で、メンバーシップ判定に使われる。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// 新しい UserId を作成（空文字列は不可）
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 表示名（ハンドシェイクで自己申告された名前をそのまま信頼する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// 新しい DisplayName を作成（空白のみは不可）
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyDisplayName);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 接続ごとに発行される参加者 ID
///
/// ユーザー ID とは独立で、同じユーザーが複数接続すればそれぞれ別の
/// ParticipantId を持つ。部屋が存在する間は再利用されない（UUID v4）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    /// 新しい ParticipantId を発行
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// 文字列表現から ParticipantId を復元（シグナリングの宛先指定に使用）
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| ValidationError::InvalidParticipantId(value.to_string()))
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// チャットメッセージ ID（UUID v4）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    /// 新しい MessageId を発行
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// チャット本文
///
/// 前後の空白を取り除いた上で保持する。空になる本文は拒否され、
/// 呼び出し側（UseCase）はそのメッセージを黙って破棄する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatText(String);

impl ChatText {
    /// 新しい ChatText を作成（trim 後に空なら不可）
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyChatText);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix タイムスタンプ（UTC、ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    /// 新しい Timestamp を作成
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    /// ミリ秒の値を取得
    pub fn value(&self) -> i64 {
        self.0
    }
}
