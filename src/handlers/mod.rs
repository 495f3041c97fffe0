pub mod health_handler;
pub mod question_handler;
pub mod test_attempt_handler;
pub mod test_handler;

use actix_web::web;

pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use question_handler::{
    bulk_add_questions, create_question, delete_question, get_question, list_questions,
    subject_stats, update_question,
};
pub use test_attempt_handler::{create_test_attempt, get_test_attempt, list_test_attempts};
pub use test_handler::{create_test, get_test, list_tests};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(list_questions)
        .service(subject_stats)
        .service(bulk_add_questions)
        .service(get_question)
        .service(create_question)
        .service(update_question)
        .service(delete_question)
        .service(create_test_attempt)
        .service(list_test_attempts)
        .service(get_test_attempt)
        .service(create_test)
        .service(list_tests)
        .service(get_test);
}
