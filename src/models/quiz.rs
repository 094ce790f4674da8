use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 测验元数据
///
/// 由班级持有，对会话只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    /// 时长（分钟）
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classroom: Option<String>,
    #[serde(rename = "isActive", default = "default_active")]
    pub is_active: bool,
    #[serde(rename = "startsOn", default, skip_serializing_if = "Option::is_none")]
    pub starts_on: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// 测验当前是否可作答
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Open,
    Inactive,
    NotYetOpen(DateTime<Utc>),
}

impl Quiz {
    /// 倒计时总秒数
    pub fn duration_seconds(&self) -> u32 {
        self.duration.saturating_mul(60)
    }

    pub fn availability(&self, now: DateTime<Utc>) -> Availability {
        if !self.is_active {
            return Availability::Inactive;
        }
        match self.starts_on {
            Some(at) if at > now => Availability::NotYetOpen(at),
            _ => Availability::Open,
        }
    }
}

/// 班级测验列表中的一行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassroomQuiz {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub duration: u32,
    #[serde(rename = "isActive", default = "default_active")]
    pub is_active: bool,
    #[serde(rename = "startsOn", default, skip_serializing_if = "Option::is_none")]
    pub starts_on: Option<DateTime<Utc>>,
}

impl std::fmt::Display for ClassroomQuiz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.is_active { "进行中" } else { "未激活" };
        write!(f, "{} [{}] {} 分钟 ({})", self.title, self.id, self.duration, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn quiz(is_active: bool, starts_on: Option<DateTime<Utc>>) -> Quiz {
        Quiz {
            id: "q1".to_string(),
            title: "Algebra".to_string(),
            duration: 2,
            classroom: None,
            is_active,
            starts_on,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn parses_wire_format() {
        let quiz: Quiz = serde_json::from_str(
            r#"{"_id":"abc","title":"T","duration":5,"classroom":"c1","isActive":true,
                "startsOn":"2024-03-01T09:00:00Z","questions":["x","y"]}"#,
        )
        .unwrap();
        assert_eq!(quiz.id, "abc");
        assert_eq!(quiz.duration_seconds(), 300);
        assert!(quiz.starts_on.is_some());
    }

    #[test]
    fn availability_respects_active_flag_and_start() {
        let now = Utc::now();
        assert_eq!(quiz(false, None).availability(now), Availability::Inactive);
        assert_eq!(quiz(true, None).availability(now), Availability::Open);
        assert_eq!(
            quiz(true, Some(now - Duration::minutes(1))).availability(now),
            Availability::Open
        );
        let later = now + Duration::hours(1);
        assert_eq!(
            quiz(true, Some(later)).availability(now),
            Availability::NotYetOpen(later)
        );
    }
}
