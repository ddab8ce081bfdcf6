pub mod category_bar;
pub mod progress_bar;
pub mod question_card;
pub mod question_list;
