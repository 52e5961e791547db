/// Метаданные UseCase для идентификации и документирования
pub trait UseCaseMetadata {
    /// Индекс UseCase (например, "u101")
    fn usecase_index() -> &'static str;

    /// Техническое имя (например, "chat_pipeline")
    fn usecase_name() -> &'static str;

    /// Отображаемое имя для UI
    fn display_name() -> &'static str;

    fn description() -> &'static str {
        ""
    }

    /// Полное имя вида "u101_chat_pipeline"
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u101_chat_pipeline::ChatPipeline;
    use crate::usecases::u102_ingest_documents::IngestDocuments;

    #[test]
    fn test_full_name() {
        assert_eq!(ChatPipeline::full_name(), "u101_chat_pipeline");
        assert_eq!(IngestDocuments::full_name(), "u102_ingest_documents");
    }
}
