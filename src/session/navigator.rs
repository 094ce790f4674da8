//! 题目导航器
//!
//! 在有序题目序列中前进/后退，边界处不回绕也不报错。

use crate::error::SessionError;

#[derive(Debug, Clone)]
pub struct QuestionNavigator {
    question_ids: Vec<String>,
    position: usize,
}

impl QuestionNavigator {
    /// 用非空题目序列创建导航器
    ///
    /// 空序列属于调用方误用，返回 [`SessionError::NoQuestions`]；
    /// 展示层应改为显示"测验不可用"。
    pub fn new(question_ids: Vec<String>) -> Result<Self, SessionError> {
        if question_ids.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        Ok(Self {
            question_ids,
            position: 0,
        })
    }

    /// 前进一题，已在最后一题时不动。返回位置是否改变。
    pub fn next(&mut self) -> bool {
        if self.position + 1 < self.question_ids.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// 后退一题，已在第一题时不动。返回位置是否改变。
    pub fn previous(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            true
        } else {
            false
        }
    }

    /// 跳到指定题目，越界时不动
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.question_ids.len() && index != self.position {
            self.position = index;
            true
        } else {
            false
        }
    }

    pub fn current_index(&self) -> usize {
        self.position
    }

    pub fn current_question_id(&self) -> &str {
        &self.question_ids[self.position]
    }

    pub fn total_count(&self) -> usize {
        self.question_ids.len()
    }

    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 == self.question_ids.len()
    }

    /// `(currentIndex + 1) / totalCount`，取值范围 (0, 1]
    pub fn progress_fraction(&self) -> f64 {
        (self.position + 1) as f64 / self.question_ids.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(n: usize) -> QuestionNavigator {
        QuestionNavigator::new((1..=n).map(|i| format!("q{}", i)).collect()).unwrap()
    }

    #[test]
    fn empty_sequence_is_rejected() {
        assert_eq!(
            QuestionNavigator::new(Vec::new()).unwrap_err(),
            SessionError::NoQuestions
        );
    }

    #[test]
    fn previous_at_first_is_noop() {
        let mut nav = nav(3);
        assert!(!nav.previous());
        assert_eq!(nav.current_index(), 0);
        assert_eq!(nav.current_question_id(), "q1");
    }

    #[test]
    fn next_at_last_is_noop() {
        let mut nav = nav(3);
        assert!(nav.next());
        assert!(nav.next());
        assert!(!nav.next());
        assert_eq!(nav.current_index(), 2);
        assert!(nav.is_last());
    }

    #[test]
    fn progress_fraction_spans_zero_to_one() {
        let mut nav = nav(4);
        assert_eq!(nav.progress_fraction(), 0.25);
        nav.jump_to(3);
        assert_eq!(nav.progress_fraction(), 1.0);
        assert!(!nav.jump_to(4));
        assert_eq!(nav.current_index(), 3);
    }

    #[test]
    fn single_question_is_both_first_and_last() {
        let mut nav = nav(1);
        assert!(nav.is_first() && nav.is_last());
        assert!(!nav.next());
        assert!(!nav.previous());
        assert_eq!(nav.progress_fraction(), 1.0);
    }
}
