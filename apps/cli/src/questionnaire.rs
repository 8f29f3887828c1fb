use std::io::{BufRead, Write};

use async_trait::async_trait;
use plan1q_core::errors::{Result, ValidationError};
use plan1q_core::profile::{ProfileAnswer, ProfileQuestion, QuestionnaireResponder};

/// Asks the risk questionnaire on the terminal.
pub struct StdinQuestionnaire;

#[async_trait]
impl QuestionnaireResponder for StdinQuestionnaire {
    async fn answer(&self, questions: &[ProfileQuestion]) -> Result<Vec<ProfileAnswer>> {
        let questions = questions.to_vec();
        tokio::task::spawn_blocking(move || ask_all(&questions))
            .await
            .map_err(|e| ValidationError::InvalidInput(format!("questionnaire aborted: {}", e)))?
    }
}

fn ask_all(questions: &[ProfileQuestion]) -> Result<Vec<ProfileAnswer>> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut answers = Vec::with_capacity(questions.len());

    println!("투자 성향 설문 ({}문항)", questions.len());
    for (index, question) in questions.iter().enumerate() {
        println!("\n{}. {}", index + 1, question.content);
        for option in &question.options {
            println!("   [{}] {}", option.value, option.label);
        }

        let answer = loop {
            print!("> ");
            std::io::stdout().flush().ok();
            let line = lines
                .next()
                .transpose()
                .map_err(|e| ValidationError::InvalidInput(e.to_string()))?
                .ok_or_else(|| ValidationError::MissingField(format!("question {}", question.question_id)))?;
            let line = line.trim().to_string();

            let known = question.options.is_empty()
                || question.options.iter().any(|o| o.value == line);
            if !line.is_empty() && known {
                break line;
            }
            println!("보기 중에서 선택해주세요.");
        };

        answers.push(ProfileAnswer {
            question_id: question.question_id,
            answer,
        });
    }
    Ok(answers)
}

/// Reads one trimmed line from stdin after printing `prompt`, off the async
/// runtime.
pub async fn prompt_line(prompt: &str) -> Result<String> {
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || read_prompted(&mut std::io::stdin().lock(), &prompt))
        .await
        .map_err(|e| ValidationError::InvalidInput(format!("prompt aborted: {}", e)))?
}

fn read_prompted(reader: &mut impl BufRead, prompt: &str) -> Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush().ok();
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .map_err(|e| ValidationError::InvalidInput(e.to_string()))?;
    if read == 0 {
        return Err(ValidationError::MissingField(prompt.trim().to_string()).into());
    }
    Ok(line.trim().to_string())
}
