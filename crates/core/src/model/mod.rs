mod data;
mod operator;
mod options;
mod question;
mod results;
mod settings;

pub use data::{DataError, PersistedData, SCHEMA_VERSION};
pub use operator::{MathOperator, MatrixOperator, ParseSessionTypeError, SessionType};
pub use options::{
    DEFAULT_MATRIX_QUESTION_COUNT, DEFAULT_RANDOM_QUESTION_COUNT, MAX_QUESTION_COUNT,
    OPERAND_BOUNDS, OperandRange, OperandSource, OptionsError, QuestionOrder, SessionOptions,
    SessionTemplate,
};
pub use question::{Answer, ArithmeticQuestion, MatrixQuestion, Question};
pub use results::{IndividualBreakdown, ResultsError, SessionResults};
pub use settings::{
    DEFAULT_ANSWER_TIME_CAP_MS, DEFAULT_FEEDBACK_DELAY_MS, MAX_FEEDBACK_DELAY_MS, Settings,
    SettingsDraft, SettingsError, TimeCap,
};
