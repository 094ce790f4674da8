use crate::error::{AppError, AppResult};
use crate::models::question::Question;
use crate::models::quiz::Quiz;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 离线测验文件：一个 `[quiz]` 表加若干 `[[questions]]`
#[derive(Debug, Clone, Deserialize)]
pub struct QuizFixture {
    pub quiz: Quiz,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// 从 TOML 文件加载离线测验
pub async fn load_quiz_fixture(path: &Path) -> AppResult<QuizFixture> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(display.clone(), e))?;

    let fixture: QuizFixture =
        toml::from_str(&content).map_err(|e| AppError::toml_parse_failed(display.clone(), e))?;

    tracing::info!(
        "成功加载离线测验 {}: {} 个题目",
        fixture.quiz.title,
        fixture.questions.len()
    );

    Ok(fixture)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        [quiz]
        id = "practice-1"
        title = "Capitals"
        duration = 1
        startsOn = "2024-01-01T00:00:00Z"

        [[questions]]
        id = "q1"
        prompt = "Capital of France?"
        options = ["Berlin", "Paris", "Rome", "Madrid"]
        correctAnswer = 1

        [[questions]]
        id = "q2"
        prompt = "Capital of Peru?"
        options = ["Lima", "Quito"]
    "#;

    #[test]
    fn parses_fixture_with_aliases() {
        let fixture: QuizFixture = toml::from_str(FIXTURE).unwrap();
        assert_eq!(fixture.quiz.id, "practice-1");
        assert!(fixture.quiz.is_active);
        assert_eq!(fixture.questions.len(), 2);
        assert_eq!(fixture.questions[0].correct_answer, Some(1));
        assert_eq!(fixture.questions[1].options.len(), 2);
    }

    #[tokio::test]
    async fn missing_file_is_a_file_error() {
        let err = load_quiz_fixture(Path::new("definitely/not/here.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::File(_)));
    }
}
