use crate::core::config::data::Config;
use crate::core::config::defaults::DEFAULT_API_BASE_URL;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.api_base_url {
            Some(url) => println!("  api-base-url: {url}"),
            None => println!("  api-base-url: (unset, using {DEFAULT_API_BASE_URL})"),
        }
        match self.session_backend {
            Some(backend) => println!("  session-backend: {backend}"),
            None => println!("  session-backend: (unset, using file)"),
        }
        match self.ai_session_minutes {
            Some(minutes) => println!("  ai-session-minutes: {minutes}"),
            None => println!("  ai-session-minutes: (unset, using 60)"),
        }
        match self.therapist_session_minutes {
            Some(minutes) => println!("  therapist-session-minutes: {minutes}"),
            None => println!("  therapist-session-minutes: (unset, using 60)"),
        }
    }
}
