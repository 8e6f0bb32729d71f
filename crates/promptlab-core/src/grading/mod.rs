use async_trait::async_trait;
use rand::Rng;

/// Scores one model response on a 1-5 scale given the prompt and the
/// expected output. Real grading logic is undefined for now; the seam
/// exists so a judge-backed implementation can replace the placeholder
/// without touching the runner.
#[async_trait]
pub trait Grader: Send + Sync {
    async fn grade(
        &self,
        prompt: &str,
        expected_output: &str,
        response: &str,
    ) -> anyhow::Result<u32>;
    fn grader_type(&self) -> &'static str;
}

/// Placeholder grader: a random integer in 1..=5.
pub struct RandomGrader;

#[async_trait]
impl Grader for RandomGrader {
    async fn grade(
        &self,
        _prompt: &str,
        _expected_output: &str,
        _response: &str,
    ) -> anyhow::Result<u32> {
        Ok(rand::thread_rng().gen_range(1..=5u32))
    }

    fn grader_type(&self) -> &'static str {
        "auto"
    }
}

/// Always returns the same score. Test helper.
pub struct FixedGrader(pub u32);

#[async_trait]
impl Grader for FixedGrader {
    async fn grade(
        &self,
        _prompt: &str,
        _expected_output: &str,
        _response: &str,
    ) -> anyhow::Result<u32> {
        Ok(self.0)
    }

    fn grader_type(&self) -> &'static str {
        "fixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn random_grader_stays_in_range() -> anyhow::Result<()> {
        let g = RandomGrader;
        for _ in 0..100 {
            let score = g.grade("p", "e", "r").await?;
            assert!((1..=5).contains(&score));
        }
        Ok(())
    }
}
