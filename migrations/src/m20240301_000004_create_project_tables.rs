use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_identity_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(Projects::ProjectCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::ClientName).string().not_null())
                    .col(ColumnDef::new(Projects::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Projects::ManagerId).uuid().null())
                    .col(ColumnDef::new(Projects::ContractValue).decimal().null())
                    .col(ColumnDef::new(Projects::SourceOrderId).string().null())
                    .col(ColumnDef::new(Projects::Description).text().null())
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Projects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_manager")
                            .from(Projects::Table, Projects::ManagerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MilestoneTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MilestoneTemplates::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MilestoneTemplates::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MilestoneTemplates::Description)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MilestoneTemplates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MilestoneTemplates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MilestoneTemplateItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MilestoneTemplateItems::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MilestoneTemplateItems::TemplateId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MilestoneTemplateItems::Sequence)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MilestoneTemplateItems::Name)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MilestoneTemplateItems::DurationDays)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MilestoneTemplateItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MilestoneTemplateItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_template_items_template")
                            .from(
                                MilestoneTemplateItems::Table,
                                MilestoneTemplateItems::TemplateId,
                            )
                            .to(MilestoneTemplates::Table, MilestoneTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProjectMilestones::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectMilestones::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectMilestones::ProjectId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProjectMilestones::Name).string().not_null())
                    .col(
                        ColumnDef::new(ProjectMilestones::Sequence)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectMilestones::StartDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProjectMilestones::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(ProjectMilestones::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectMilestones::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectMilestones::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_milestones_project")
                            .from(ProjectMilestones::Table, ProjectMilestones::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProjectTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectTasks::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProjectTasks::MilestoneId).uuid().not_null())
                    .col(ColumnDef::new(ProjectTasks::Name).string().not_null())
                    .col(ColumnDef::new(ProjectTasks::AssigneeId).uuid().null())
                    .col(
                        ColumnDef::new(ProjectTasks::ProgressPct)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProjectTasks::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProjectTasks::Notes).text().null())
                    .col(
                        ColumnDef::new(ProjectTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectTasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_milestone")
                            .from(ProjectTasks::Table, ProjectTasks::MilestoneId)
                            .to(ProjectMilestones::Table, ProjectMilestones::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLogs::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ActivityLogs::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(ActivityLogs::ActorId).uuid().null())
                    .col(ColumnDef::new(ActivityLogs::Action).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::Detail).json().null())
                    .col(
                        ColumnDef::new(ActivityLogs::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_logs_project")
                            .from(ActivityLogs::Table, ActivityLogs::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectTasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectMilestones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MilestoneTemplateItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MilestoneTemplates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Projects {
    Table,
    Id,
    ProjectCode,
    Name,
    ClientName,
    Status,
    ManagerId,
    ContractValue,
    SourceOrderId,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum MilestoneTemplates {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum MilestoneTemplateItems {
    Table,
    Id,
    TemplateId,
    Sequence,
    Name,
    DurationDays,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum ProjectMilestones {
    Table,
    Id,
    ProjectId,
    Name,
    Sequence,
    StartDate,
    EndDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum ProjectTasks {
    Table,
    Id,
    MilestoneId,
    Name,
    AssigneeId,
    ProgressPct,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum ActivityLogs {
    Table,
    Id,
    ProjectId,
    ActorId,
    Action,
    Detail,
    RecordedAt,
}
